use super::*;
use expect_test::{Expect, expect};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn check(raw: &str, expect: Expect) {
    expect.assert_eq(&clean_tab_text(raw));
}

fn kinds(raw: &str) -> Vec<LineKind> {
    let mut in_block = false;
    raw.lines()
        .map(|line| {
            let kind = classify_line(line, in_block);
            in_block = kind.next_block_state(in_block);
            kind
        })
        .collect()
}

#[test]
fn empty_input_cleans_to_empty() {
    assert_eq!(clean_tab_text(""), "");
}

#[test]
fn prose_without_any_block_is_dropped() {
    check(
        "This is one of my favourite songs.\nIt took me ages to work out.\n",
        expect![[""]],
    );
}

#[test]
fn keeps_tab_lines_and_drops_contact_details() {
    check(
        "Tabbed by Joe\nContact: foo@bar.com\ne|------------------------|\nB|--1---1---1---1---------|\n",
        expect![[r#"
            e|------------------------|
            B|--1---1---1---1---------|"#]],
    );
}

#[test]
fn seeded_verse_round_trips() {
    check(
        "[Verse]\nAm    G    C    F\nAm    G    C    F\n",
        expect![[r#"
            [Verse]
            Am    G    C    F
            Am    G    C    F"#]],
    );
}

#[test]
fn chord_line_is_kept_before_any_block() {
    check("Am    G    C    F", expect![["Am    G    C    F"]]);
}

#[test]
fn blank_line_closes_the_block_and_never_survives() {
    check(
        "[Intro]\nlet ring\n\nsome prose after the intro\n",
        expect![[r#"
            [Intro]
            let ring"#]],
    );
}

#[test]
fn blank_boundary_is_emitted_then_filtered() {
    assert_eq!(retained_lines("[Intro]\n\n"), vec!["[Intro]", ""]);
    assert_eq!(clean_tab_text("[Intro]\n\n"), "[Intro]");
}

#[test]
fn lyrics_inside_a_block_are_kept() {
    check(
        "Song: Wish You Were Here\n[Intro]\ne|-----0-----|\nB|---3---3---|\n(strum lightly)\n\nTranscribed 3-14-2021 by someone@example.com\n[Verse]\nC            D/F#\nSo, so you think you can tell\n",
        expect![[r#"
            [Intro]
            e|-----0-----|
            B|---3---3---|
            (strum lightly)
            [Verse]
            C            D/F#
            So, so you think you can tell"#]],
    );
}

#[test]
fn noise_wins_over_tab_shape() {
    assert_eq!(classify_line("e|--0--| tab@home", false), LineKind::Noise);
    assert_eq!(clean_tab_text("e|--0--|@"), "");
}

#[test]
fn date_shaped_tab_line_is_noise() {
    // `3-12-10` reads as a date before it reads as frets.
    assert_eq!(classify_line("e|--3-12-10--|", false), LineKind::Noise);
    check("e|--3-12-10--|\ne|--3--12--|", expect![["e|--3--12--|"]]);
}

#[test]
fn noise_does_not_touch_block_state() {
    check(
        "[Solo]\nemail me for the rest\nhold the bend\n",
        expect![[r#"
            [Solo]
            hold the bend"#]],
    );
}

#[test]
fn classification_follows_the_rule_order() {
    let raw = "junk\n[Intro]\ne|--0--|\nnote\n\nAm G\nafter\n  \n";
    assert_eq!(
        kinds(raw),
        vec![
            LineKind::Discard,
            LineKind::SectionHeader,
            LineKind::TabLine,
            LineKind::PlainInBlock,
            LineKind::BlankBoundary,
            LineKind::ChordLine,
            LineKind::Discard,
            LineKind::Noise,
        ]
    );
}

#[test]
fn chord_line_does_not_open_a_block() {
    check(
        "G D Em C\nwhen the night has come\n",
        expect![["G D Em C"]],
    );
}

#[test]
fn tab_line_letter_is_case_insensitive() {
    assert_eq!(classify_line("a|--2--|", false), LineKind::TabLine);
    assert_eq!(classify_line("E|--0--|", false), LineKind::TabLine);
}

#[test]
fn indented_tab_line_does_not_open_a_block() {
    assert_eq!(classify_line("  e|--0--|", false), LineKind::Discard);
    check("  e|--0--|\nlet ring\n", expect![[""]]);
    check(
        "[Intro]\n  e|--0--|\nlet ring\n",
        expect![[r#"
            [Intro]
              e|--0--|
            let ring"#]],
    );
}

#[test]
fn crlf_input_is_split_like_lf() {
    check(
        "[Intro]\r\ne|--0--|\r\n\r\nprose\r\n",
        expect![[r#"
            [Intro]
            e|--0--|"#]],
    );
}

#[test]
fn trailing_whitespace_is_kept_on_retained_lines() {
    assert_eq!(clean_tab_text("[Intro]  \nAm G  "), "[Intro]  \nAm G  ");
}

#[test]
fn batch_cleaning_preserves_ids_and_order() {
    let records = vec![(1, "e|---|".to_owned()), (2, "bad@x.com".to_owned())];
    assert_eq!(
        clean_all(records),
        vec![(1, "e|---|".to_owned()), (2, String::new())]
    );
}

#[test]
fn batch_cleaning_resets_block_state_per_record() {
    let records = vec![
        ("a", "[Intro]".to_owned()),
        ("b", "free text without a header".to_owned()),
    ];
    assert_eq!(
        clean_all(records),
        vec![("a", "[Intro]".to_owned()), ("b", String::new())]
    );
}

fn line_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("   ".to_owned()),
        Just("[Intro]".to_owned()),
        Just("[Chorus x2]".to_owned()),
        Just("e|--0--2--3--|".to_owned()),
        Just("G|--2h4p2--(5)~~--|".to_owned()),
        Just("Am    G    C    F".to_owned()),
        Just("F#m7 / Bb".to_owned()),
        Just("contact me@host.org".to_owned()),
        Just("Email: nobody".to_owned()),
        Just("12/25 christmas version".to_owned()),
        Just("uploaded 1-2-2020".to_owned()),
        "[a-z ]{1,20}",
        "[ -~]{0,30}",
    ]
}

fn document_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(line_strategy(), 0..25).prop_map(|lines| lines.join("\n"))
}

fn noise_strategy() -> impl Strategy<Value = String> {
    let line = prop_oneof![
        Just(String::new()),
        Just(" \t ".to_owned()),
        "[a-z]{1,8}@[a-z]{1,8}\\.[a-z]{2,3}",
        "[0-9]{1,2}/[0-9]{1,2}[a-z ]{0,10}",
        "[a-z ]{0,10}[0-9]{1,2}-[0-9]{1,2}-[0-9]{2,4}",
        "[a-z ]{0,6}(email|EMAIL|Email)[a-z ]{0,6}",
    ];
    prop::collection::vec(line, 0..15).prop_map(|lines| lines.join("\n"))
}

proptest! {
    #[test]
    fn cleaning_is_idempotent(raw in document_strategy()) {
        let once = clean_tab_text(&raw);
        prop_assert_eq!(clean_tab_text(&once), once);
    }

    #[test]
    fn noise_only_documents_clean_to_empty(raw in noise_strategy()) {
        prop_assert_eq!(clean_tab_text(&raw), "");
    }

    #[test]
    fn output_never_contains_blank_lines(raw in "\\PC{0,200}") {
        let cleaned = clean_tab_text(&raw);
        prop_assert!(cleaned.lines().all(|line| !line.trim_end().is_empty()));
    }

    #[test]
    fn output_lines_come_from_the_input_in_order(raw in document_strategy()) {
        let cleaned = clean_tab_text(&raw);
        let mut source = raw.lines();
        for line in cleaned.lines() {
            prop_assert!(source.any(|candidate| candidate == line));
        }
    }
}
