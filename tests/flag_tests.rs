//! Flag codec tests

use rexamine::RegexFlags;

#[test]
fn flag_string_round_trips_for_all_64_combinations() {
    for bits in 0..64u32 {
        let flags = RegexFlags::from_bits_truncate(bits);
        let encoded = flags.to_flag_string();
        let decoded = RegexFlags::from_flag_string(&encoded).unwrap();
        assert_eq!(decoded, flags, "round trip failed for {encoded:?}");
    }
}

#[test]
fn flag_string_uses_canonical_order() {
    assert_eq!(RegexFlags::all().to_flag_string(), "gimsuy");
    assert_eq!(
        (RegexFlags::STICKY | RegexFlags::GLOBAL).to_flag_string(),
        "gy"
    );
    assert_eq!(RegexFlags::empty().to_flag_string(), "");
}

#[test]
fn unknown_flag_letter_is_rejected() {
    assert!(RegexFlags::from_flag_string("gx").is_err());
    assert!(RegexFlags::from_flag_string(" ").is_err());
}

#[test]
fn only_inline_capable_flags_appear_in_the_prefix() {
    let flags = RegexFlags::GLOBAL
        | RegexFlags::IGNORE_CASE
        | RegexFlags::DOT_ALL
        | RegexFlags::STICKY;
    assert_eq!(flags.inline_prefix(), "(?i)(?s)");
    assert_eq!(RegexFlags::MULTILINE.inline_prefix(), "(?m)");
    assert_eq!(RegexFlags::empty().inline_prefix(), "");
}
