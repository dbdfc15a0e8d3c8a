// Cross-backend tests for the tokeniser: every scan primitive must behave
// identically over all four source backends, and over sub-tokeniser views of
// them.
// Run with `cargo test --test tokeniser_test`

use std::io::Cursor;

use runelex::Tokeniser;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// The four source backends.
fn backends<'h>(input: &'h str) -> Vec<(&'static str, Tokeniser<'h>)> {
    vec![
        ("text", Tokeniser::from_text(input)),
        ("bytes", Tokeniser::from_bytes(input.as_bytes())),
        ("reader", Tokeniser::from_reader(Cursor::new(input.as_bytes()))),
        ("chars", Tokeniser::from_chars(input.chars())),
    ]
}

/// The four backends plus a fresh sub-tokeniser view of each.
fn tokenisers<'h>(input: &'h str) -> Vec<(&'static str, Tokeniser<'h>)> {
    let mut all = backends(input);

    all.extend([
        ("sub (text)", Tokeniser::from_text(input).sub_tokeniser()),
        (
            "sub (bytes)",
            Tokeniser::from_bytes(input.as_bytes()).sub_tokeniser(),
        ),
        (
            "sub (reader)",
            Tokeniser::from_reader(Cursor::new(input.as_bytes())).sub_tokeniser(),
        ),
        (
            "sub (chars)",
            Tokeniser::from_chars(input.chars()).sub_tokeniser(),
        ),
    ]);

    all
}

#[test]
fn test_next_and_peek() {
    init();

    for (name, mut t) in tokenisers("ABCDEFGH") {
        assert_eq!(t.peek(), Some('A'), "{name}: first peek");
        assert_eq!(t.peek(), Some('A'), "{name}: peek is stable");
        assert_eq!(t.next_char(), Some('A'), "{name}: first next");
        assert_eq!(t.next_char(), Some('B'), "{name}: second next");
        assert_eq!(t.peek(), Some('C'), "{name}: peek after next");
    }
}

#[test]
fn test_len() {
    init();

    for (name, mut t) in tokenisers("A…") {
        t.peek();
        assert_eq!(t.len(), 0, "{name}: peek consumes nothing");

        t.next_char();
        assert_eq!(t.len(), 1, "{name}: after 'A'");

        t.next_char();
        assert_eq!(t.len(), 4, "{name}: after '…'");

        t.next_char();
        assert_eq!(t.len(), 4, "{name}: at end of input");

        t.next_char();
        assert_eq!(t.len(), 4, "{name}: end of input is idempotent");
    }
}

#[test]
fn test_accept() {
    init();

    for (name, mut t) in tokenisers("ABC£") {
        t.accept("ABCD");
        assert_eq!(t.flush(), "A", "{name}: test 1");
        t.accept("ABCD");
        assert_eq!(t.flush(), "B", "{name}: test 2");
        t.accept("ABCD");
        assert_eq!(t.flush(), "C", "{name}: test 3");
        t.accept("ABCD");
        assert_eq!(t.flush(), "", "{name}: test 4");
        t.accept("£");
        assert_eq!(t.flush(), "£", "{name}: test 5");
    }
}

#[test]
fn test_accept_run() {
    init();

    for (name, mut t) in tokenisers("123ABC££$$%%^^\n") {
        assert_eq!(t.accept_run("0123456789"), Some('A'), "{name}: stopper 1");
        assert_eq!(t.flush(), "123", "{name}: test 1");
        t.accept_run("ABC");
        assert_eq!(t.flush(), "ABC", "{name}: test 2");
        t.accept_run("£$%^");
        assert_eq!(t.flush(), "££$$%%^^", "{name}: test 3");
        assert_eq!(t.accept_run("\n"), None, "{name}: run to end of input");
        assert_eq!(t.flush(), "\n", "{name}: test 4");
    }
}

#[test]
fn test_except() {
    init();

    for (name, mut t) in tokenisers("123") {
        t.except("1");
        assert_eq!(t.flush(), "", "{name}: test 1");
        t.except("2");
        assert_eq!(t.flush(), "1", "{name}: test 2");
        t.except("2");
        assert_eq!(t.flush(), "", "{name}: test 3");
        t.except("!");
        assert_eq!(t.flush(), "2", "{name}: test 4");
        t.except("!");
        assert_eq!(t.flush(), "3", "{name}: test 5");
        t.except("!");
        assert_eq!(t.flush(), "", "{name}: test 6");
    }
}

#[test]
fn test_except_run() {
    init();

    for (name, mut t) in tokenisers("12345ABC\n67890DEF\nOH MY!") {
        assert_eq!(t.except_run("\n"), Some('\n'), "{name}: stopper 1");
        assert_eq!(t.flush(), "12345ABC", "{name}: test 1");

        t.except("");
        t.flush();
        t.except_run("\n");
        assert_eq!(t.flush(), "67890DEF", "{name}: test 2");

        t.except("");
        t.flush();
        assert_eq!(t.except_run(""), None, "{name}: run to end of input");
        assert_eq!(t.flush(), "OH MY!", "{name}: test 3");
    }
}

#[test]
fn test_reset() {
    init();

    for (name, mut t) in tokenisers("ABCDEFGHIJKLMNOPQRSTUVWXYZ") {
        t.except_run("E");
        t.reset();

        assert_eq!(t.flush(), "", "{name}: flush after reset is empty");

        t.except_run("E");
        assert_eq!(t.flush(), "ABCD", "{name}: rescan reproduces the region");
    }
}

#[test]
fn test_checkpoint_restore() {
    init();

    for (name, mut t) in tokenisers("12345ABC\n67890DEF\nOH MY!") {
        for round in 1..=2 {
            let cp = t.checkpoint();

            let a = t.next_char();
            let b = t.next_char();
            let c = t.next_char();
            let d = t.next_char();
            let len = t.len();

            assert!(cp.restore(), "{name}: restore {round} succeeds");

            assert_eq!(t.next_char(), a, "{name}: restore {round} char 1");
            assert_eq!(t.next_char(), b, "{name}: restore {round} char 2");
            assert_eq!(t.next_char(), c, "{name}: restore {round} char 3");
            assert_eq!(t.next_char(), d, "{name}: restore {round} char 4");
            assert_eq!(t.len(), len, "{name}: restore {round} len");
        }
    }
}

#[test]
fn test_checkpoint_stale_after_flush() {
    init();

    for (name, mut t) in backends("ABCDEF") {
        let cp = t.checkpoint();

        t.next_char();
        t.next_char();
        t.flush();

        assert!(!cp.restore(), "{name}: restore across a flush must fail");
        assert_eq!(
            t.next_char(),
            Some('C'),
            "{name}: position is left untouched"
        );
    }
}

#[test]
fn test_accept_string() {
    init();

    struct Test {
        str: &'static str,
        read: usize,
        case_insensitive: bool,
    }

    const TESTS: &[Test] = &[
        Test {
            str: "Z",
            read: 0,
            case_insensitive: false,
        },
        Test {
            str: "A",
            read: 1,
            case_insensitive: false,
        },
        Test {
            str: "BCD",
            read: 3,
            case_insensitive: false,
        },
        Test {
            str: "EFGZ",
            read: 3,
            case_insensitive: false,
        },
        Test {
            str: "hij",
            read: 0,
            case_insensitive: false,
        },
        Test {
            str: "hij",
            read: 3,
            case_insensitive: true,
        },
    ];

    for (name, mut t) in tokenisers("ABCDEFGHIJKLMNOPQRSTUVWXYZ") {
        for (n, test) in TESTS.iter().enumerate() {
            assert_eq!(
                t.accept_string(test.str, test.case_insensitive),
                test.read,
                "{name}: test {}",
                n + 1
            );
        }
    }
}

#[test]
fn test_accept_word() {
    init();

    struct Test {
        words: &'static [&'static str],
        read: &'static str,
        case_insensitive: bool,
    }

    const TESTS: &[Test] = &[
        Test {
            words: &[],
            read: "",
            case_insensitive: false,
        },
        Test {
            words: &["Z"],
            read: "",
            case_insensitive: false,
        },
        Test {
            words: &["Z", "Y"],
            read: "",
            case_insensitive: false,
        },
        Test {
            words: &["A"],
            read: "A",
            case_insensitive: false,
        },
        Test {
            words: &["BD"],
            read: "",
            case_insensitive: false,
        },
        Test {
            words: &["BD", "BE"],
            read: "",
            case_insensitive: false,
        },
        Test {
            words: &["BCD", "BCE"],
            read: "BCD",
            case_insensitive: false,
        },
        Test {
            words: &["EFH", "EFG"],
            read: "EFG",
            case_insensitive: false,
        },
        Test {
            words: &["HIJ", "HIJK"],
            read: "HIJK",
            case_insensitive: false,
        },
        Test {
            words: &["LMNOP", "LMOPQ", "LmNoPqR"],
            read: "LMNOPQR",
            case_insensitive: true,
        },
        Test {
            words: &["ZYX", "ST", "STZ"],
            read: "ST",
            case_insensitive: false,
        },
    ];

    for (name, mut t) in tokenisers("ABCDEFGHIJKLMNOPQRSTUVWXYZ") {
        for (n, test) in TESTS.iter().enumerate() {
            assert_eq!(
                t.accept_word(test.words, test.case_insensitive),
                test.read,
                "{name}: test {}",
                n + 1
            );
        }
    }
}

#[test]
fn test_accept_word_rollback_leaves_nothing_consumed() {
    init();

    for (name, mut t) in backends("STOP") {
        assert_eq!(t.accept_word(&["STAB", "STUN"], false), "", "{name}: match");
        assert_eq!(t.flush(), "", "{name}: nothing stays consumed");
        assert_eq!(t.next_char(), Some('S'), "{name}: cursor fully restored");
    }
}

#[test]
fn test_sub_tokeniser() {
    init();

    for (name, mut p) in backends("ABCDEFGHIJKLMNOPQRSTUVWXYZ") {
        assert_eq!(p.next_char(), Some('A'), "{name}: test 1");

        let mut q = p.sub_tokeniser();

        assert_eq!(q.next_char(), Some('B'), "{name}: test 2");
        assert_eq!(q.except_run("H"), Some('H'), "{name}: test 3");
        assert_eq!(q.flush(), "BCDEFG", "{name}: test 4");

        q.next_char();
        assert_eq!(q.flush(), "H", "{name}: test 5");
        assert_eq!(p.flush(), "ABCDEFGH", "{name}: test 6");

        // The parent flush invalidated the sub view, but not the shared
        // cursor.
        q.next_char();
        assert_eq!(q.flush(), "", "{name}: test 7");

        p.next_char();

        let mut q = p.sub_tokeniser();

        q.next_char();

        let mut r = q.sub_tokeniser();

        r.next_char();

        assert_eq!(r.flush(), "L", "{name}: test 8");
        assert_eq!(q.flush(), "KL", "{name}: test 9");
        assert_eq!(p.flush(), "IJKL", "{name}: test 10");
    }
}

#[test]
fn test_sub_tokeniser_len() {
    init();

    for (name, mut p) in backends("ABCDEF") {
        p.next_char();

        let mut q = p.sub_tokeniser();

        q.next_char();
        q.next_char();

        assert_eq!(q.len(), 2, "{name}: sub counts from its own boundary");
        assert_eq!(p.len(), 3, "{name}: parent counts from its flush point");

        p.flush();
        assert_eq!(q.len(), 0, "{name}: stale sub reports nothing");
    }
}

#[test]
fn test_invalid_byte_round_trips() {
    init();

    let mut t = Tokeniser::from_bytes(b"\xff");

    assert_eq!(t.next_char(), Some('\u{ff}'));
    assert_eq!(t.len(), 1);
    assert_eq!(t.flush(), "\u{ff}");
    assert_eq!(t.next_char(), None);
}

#[test]
fn test_invalid_bytes_mid_stream() {
    init();

    for (name, mut t) in [
        ("bytes", Tokeniser::from_bytes(b"ab\xffcd")),
        ("reader", Tokeniser::from_reader(Cursor::new(b"ab\xffcd"))),
    ] {
        t.except_run("");
        assert_eq!(t.flush(), "ab\u{ff}cd", "{name}: no byte is dropped");
    }
}

#[test]
fn test_word_scan_example() {
    init();

    const ALPHA: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

    for (name, mut t) in backends("Hello, World!") {
        t.accept_run(ALPHA);
        assert_eq!(t.flush(), "Hello", "{name}: first word");

        t.except_run(ALPHA);
        t.flush();

        t.accept_run(ALPHA);
        assert_eq!(t.flush(), "World", "{name}: second word");
    }
}
