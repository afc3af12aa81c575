use std::{sync::Arc, time::Duration};

use crossbeam::queue::ArrayQueue;
use rusqlite::Connection;
use tokio::{
    sync::{AcquireError, OwnedSemaphorePermit, Semaphore, TryAcquireError},
    time::timeout,
};

#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("Pool capacity must be greater than 0")]
    ZeroCapacity,
    #[error("Timeout acquiring connection")]
    Timeout,
    #[error("Pool is closed: {0}")]
    Closed(#[from] AcquireError),
    #[error("No connection available: {0}")]
    Exhausted(#[from] TryAcquireError),
    #[error("Permit granted but no connection was queued")]
    Corrupted,
}

/// Fixed set of SQLite connections handed out behind a semaphore, so that
/// waiting for a connection yields the task instead of blocking it.
#[derive(Clone, Debug)]
pub struct AsyncConnectionPool {
    connections: Arc<ArrayQueue<Connection>>,
    semaphore: Arc<Semaphore>,
}

/// A borrowed connection. Goes back to the queue on drop, before its permit
/// is released.
#[derive(Debug)]
pub struct PooledConnection {
    connection: Option<Connection>,
    connections: Arc<ArrayQueue<Connection>>,
    _permit: OwnedSemaphorePermit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolStats {
    pub capacity: usize,
    pub available: usize,
    pub in_use: usize,
}

impl AsyncConnectionPool {
    /// Opens `capacity` connections up front with `conn_fn`.
    ///
    /// # Example
    /// ``` rust
    /// use tabvault_sqlite::pooling::AsyncConnectionPool;
    /// use rusqlite::Connection;
    ///
    /// let pool = AsyncConnectionPool::new(2, || Connection::open_in_memory()).unwrap();
    /// assert_eq!(pool.stats().available, 2);
    /// ```
    pub fn new<F>(capacity: usize, conn_fn: F) -> Result<Self, PoolError>
    where
        F: Fn() -> Result<Connection, rusqlite::Error>,
    {
        if capacity == 0 {
            return Err(PoolError::ZeroCapacity);
        }

        let connections = Arc::new(ArrayQueue::new(capacity));

        for _ in 0..capacity {
            let conn = conn_fn()?;
            connections.push(conn).map_err(|_| PoolError::Corrupted)?;
        }

        Ok(Self {
            connections,
            semaphore: Arc::new(Semaphore::new(capacity)),
        })
    }

    pub fn capacity(&self) -> usize {
        self.connections.capacity()
    }

    pub fn available(&self) -> usize {
        self.connections.len()
    }

    /// Waits until a connection is free.
    ///
    /// # Errors
    /// Fails if the pool was closed while waiting.
    pub async fn acquire(&self) -> Result<PooledConnection, PoolError> {
        let permit = Semaphore::acquire_owned(self.semaphore.clone()).await?;
        self.checkout(permit)
    }

    pub async fn acquire_timeout(&self, duration: Duration) -> Result<PooledConnection, PoolError> {
        timeout(duration, self.acquire())
            .await
            .map_err(|_| PoolError::Timeout)?
    }

    /// Takes a connection only if one is free right now.
    pub fn try_acquire(&self) -> Result<PooledConnection, PoolError> {
        let permit = Semaphore::try_acquire_owned(self.semaphore.clone())?;
        self.checkout(permit)
    }

    fn checkout(&self, permit: OwnedSemaphorePermit) -> Result<PooledConnection, PoolError> {
        let connection = self.connections.pop().ok_or(PoolError::Corrupted)?;

        Ok(PooledConnection {
            connection: Some(connection),
            connections: self.connections.clone(),
            _permit: permit,
        })
    }

    /// Closes the semaphore and every idle connection. Connections still
    /// checked out are closed when their handle drops.
    pub fn close(&self) -> Vec<Result<(), (Connection, rusqlite::Error)>> {
        self.semaphore.close();

        let mut result = vec![];
        while let Some(conn) = self.connections.pop() {
            result.push(conn.close());
        }
        result
    }

    pub fn is_closed(&self) -> bool {
        self.semaphore.is_closed()
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            capacity: self.capacity(),
            available: self.available(),
            in_use: self.capacity() - self.available(),
        }
    }
}

impl core::ops::Deref for PooledConnection {
    type Target = Connection;

    #[allow(clippy::expect_used)]
    fn deref(&self) -> &Self::Target {
        self.connection
            .as_ref()
            .expect("connection is only taken on drop")
    }
}

impl core::ops::DerefMut for PooledConnection {
    #[allow(clippy::expect_used)]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.connection
            .as_mut()
            .expect("connection is only taken on drop")
    }
}

impl AsRef<Connection> for PooledConnection {
    fn as_ref(&self) -> &Connection {
        self
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        if let Some(conn) = self.connection.take() {
            if self.connections.push(conn).is_err() {
                tracing::error!("connection returned to a full pool, dropping it");
            }
        }
    }
}
