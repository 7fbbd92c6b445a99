//! Property-based tests for the tokenizer

use proptest::prelude::*;

use minish::{parse, Limits};

// Words that cannot collide with operators or the background marker.
const WORD: &str = "[a-z0-9._/-]{1,16}";

proptest! {
    /// Whatever separator padding surrounds the tokens, the argument vector
    /// is the same.
    #[test]
    fn whitespace_padding_is_invariant(
        words in prop::collection::vec(WORD, 1..8),
        sep in prop_oneof![Just(" "), Just("  "), Just("\t"), Just(" \t ")],
        lead in prop_oneof![Just(""), Just("  "), Just("\t")],
        trail in prop_oneof![Just(""), Just("  "), Just("\t")],
    ) {
        let line = format!("{}{}{}", lead, words.join(sep), trail);
        let cmd = parse(&line, &Limits::default()).expect("plain words parse");
        prop_assert_eq!(cmd.argv, words);
        prop_assert!(!cmd.background);
        prop_assert!(cmd.stdin_redirect.is_none());
        prop_assert!(cmd.stdout_redirect.is_none());
    }

    /// Appending a separated `&` detaches without disturbing the arguments.
    #[test]
    fn trailing_marker_always_detaches(words in prop::collection::vec(WORD, 1..8)) {
        let line = format!("{} &", words.join(" "));
        let cmd = parse(&line, &Limits::default()).expect("should parse");
        prop_assert_eq!(cmd.argv, words);
        prop_assert!(cmd.background);
    }

    /// Glued redirects never leak the operator character into the path.
    #[test]
    fn redirect_paths_strip_the_operator(
        program in WORD,
        path in "[a-z0-9._/-]{1,32}",
    ) {
        let line = format!("{} >{}", program, path);
        let cmd = parse(&line, &Limits::default()).expect("should parse");
        prop_assert_eq!(cmd.argv, vec![program]);
        prop_assert_eq!(
            cmd.stdout_redirect.expect("redirect set").to_string_lossy().into_owned(),
            path
        );
    }

    /// Arbitrary input never panics; it parses or is rejected, nothing else.
    #[test]
    fn parse_never_panics(line in "\\PC*") {
        let _ = parse(&line, &Limits::default());
    }
}
