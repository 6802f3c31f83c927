use capbind::{
    c_radix, capture, hex, match_and_bind, octal, radix, BindError, Dest, MatchError, Radix,
    ScanError,
};
use regex::Regex;
use rstest::rstest;

#[rstest]
#[case::octal("100", Radix::OCTAL)]
#[case::hex("40", Radix::HEX)]
#[case::auto_octal("0100", Radix::AUTO)]
#[case::auto_hex("0x40", Radix::AUTO)]
#[case::decimal("64", Radix::DECIMAL)]
#[case::binary("1000000", Radix::new(2))]
fn sixty_four_in_every_radix(#[case] text: &str, #[case] radix: Radix) {
    let re = Regex::new(r"^(\w+)$").unwrap();
    let mut n = 0i64;
    let dest = match radix {
        Radix::AUTO => c_radix(&mut n),
        Radix::OCTAL => octal(&mut n),
        Radix::HEX => hex(&mut n),
        other => capbind::radix(&mut n, other.base().unwrap()),
    };
    match_and_bind(&re, text, &mut [dest]).unwrap();
    assert_eq!(n, 64);
}

#[test]
fn binds_every_builtin_kind() {
    let re = Regex::new(r"^(\S+) (\S+) (\S+) (\S+) (\S+) (\S+) (\S+) (\S+)$").unwrap();
    let mut name = String::new();
    let mut count = 0u16;
    let mut delta = 0i8;
    let mut ratio = 0f32;
    let mut exact = 0f64;
    let mut flag = false;
    let mut initial = ' ';
    let mut tag = 0u8;

    capture!(
        &re,
        "widget 65535 -128 0.5 1e-3 T \u{e9} z",
        &mut name,
        &mut count,
        &mut delta,
        &mut ratio,
        &mut exact,
        &mut flag,
        Dest::char(&mut initial),
        Dest::byte(&mut tag),
    )
    .unwrap();

    assert_eq!(name, "widget");
    assert_eq!(count, u16::MAX);
    assert_eq!(delta, i8::MIN);
    assert_eq!(ratio, 0.5);
    assert_eq!(exact, 1e-3);
    assert!(flag);
    assert_eq!(initial, '\u{e9}');
    assert_eq!(tag, b'z');
}

#[test]
fn scan_destination_inside_match() {
    let re = Regex::new(r"^size=(\S+) name=(\S+)$").unwrap();
    let (mut w, mut h) = (0u32, 0u32);
    let mut name = String::new();
    capture!(
        &re,
        "size=640x480 name=screen",
        Dest::scan("%dx%d", vec![Dest::from(&mut w), Dest::from(&mut h)]),
        &mut name,
    )
    .unwrap();
    assert_eq!((w, h), (640, 480));
    assert_eq!(name, "screen");
}

#[test]
fn scan_partial_consumption_reports_tail() {
    let re = Regex::new(r"^(.*)$").unwrap();
    let mut n = 0i32;
    let err = capture!(&re, "010asdf", Dest::scan("%v", vec![c_radix(&mut n)])).unwrap_err();
    match err {
        MatchError::SaveFailed { index, source, .. } => {
            assert_eq!(index, 1);
            assert!(matches!(
                source,
                BindError::UnconsumedInput { remaining: 4, .. }
            ));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn scan_error_is_wrapped_with_context() {
    let re = Regex::new(r"^(.*)$").unwrap();
    let mut n = 0i32;
    let err = capture!(&re, "x", Dest::scan("%d", vec![Dest::from(&mut n)])).unwrap_err();
    assert!(matches!(
        err,
        MatchError::SaveFailed {
            source: BindError::Scan(ScanError::EmptyToken { .. }),
            ..
        }
    ));
}

#[test]
fn custom_saver_error_gets_match_context() {
    let re = Regex::new(r"^(\w+)@(\w+)$").unwrap();
    let mut user = String::new();
    let err = capture!(
        &re,
        "root@host",
        &mut user,
        Dest::with(|host| {
            anyhow::bail!("unknown host {host}");
        }),
    )
    .unwrap_err();

    assert_eq!(user, "root");
    let message = err.to_string();
    assert!(message.starts_with("submatch 2 save failed: unknown host host"));
    assert!(message.contains(r#"input: "root@host""#));
    assert!(message.contains("\nsubmatch 2: \"host\""));
}

#[test]
fn later_destinations_untouched_after_failure() {
    let re = Regex::new(r"^(\d+),(\d+),(\d+)$").unwrap();
    let (mut a, mut b, mut c) = (0u8, 0u8, 0u8);
    let err = capture!(&re, "1,999,3", &mut a, &mut b, &mut c).unwrap_err();
    assert!(matches!(
        err,
        MatchError::SaveFailed {
            index: 2,
            source: BindError::IntegerOverflow { target: "u8", .. },
            ..
        }
    ));
    assert_eq!((a, b, c), (1, 0, 0));
}

#[test]
fn diagnostics_quote_control_characters() {
    let re = Regex::new(r"^(\d+)$").unwrap();
    let mut n = 0u8;
    let err = capture!(&re, "tab\there", &mut n).unwrap_err();
    assert!(err.to_string().contains(r#"input: "tab\there""#));
}

#[test]
fn compiled_regex_is_shared_across_threads() {
    let re = Regex::new(r"^(\d+)$").unwrap();
    std::thread::scope(|s| {
        for i in 0..4u32 {
            let re = &re;
            s.spawn(move || {
                let mut n = 0u32;
                capture!(re, &i.to_string(), &mut n).unwrap();
                assert_eq!(n, i);
            });
        }
    });
}

#[test]
#[should_panic(expected = "expected 1 destinations, got 2")]
fn too_many_destinations_panics() {
    let re = Regex::new(r"(\d)").unwrap();
    let (mut a, mut b) = (0u8, 0u8);
    let _ = capture!(&re, "1", &mut a, &mut b);
}

#[test]
#[should_panic(expected = "radix 1 out of range")]
fn radix_out_of_range_panics() {
    let mut n = 0u8;
    let _ = radix(&mut n, 1);
}
