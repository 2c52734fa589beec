use shrinkray::error::Error;
use shrinkray::options::{FileSize, FileUnit, OptionRegistry, parse_file_size};
use shrinkray::resize::ResizeSpec;

#[test]
fn test_file_size_with_unit() {
    assert_eq!(
        parse_file_size("10mb").unwrap(),
        FileSize::new(10.0, FileUnit::Mb)
    );
    assert_eq!(
        parse_file_size("2.5GB").unwrap(),
        FileSize::new(2.5, FileUnit::Gb)
    );
    assert_eq!(
        parse_file_size("512b").unwrap(),
        FileSize::new(512.0, FileUnit::B)
    );
}

#[test]
fn test_file_size_defaults_to_kilobytes() {
    assert_eq!(
        parse_file_size("10").unwrap(),
        FileSize::new(10.0, FileUnit::Kb)
    );
    // Unrecognized suffixes also fall back to KB.
    assert_eq!(
        parse_file_size("10tb").unwrap(),
        FileSize::new(10.0, FileUnit::Kb)
    );
}

#[test]
fn test_file_size_without_number_rejected() {
    assert!(matches!(
        parse_file_size("abc"),
        Err(Error::InvalidNumber(_))
    ));
    assert!(matches!(parse_file_size(""), Err(Error::InvalidNumber(_))));
}

#[test]
fn test_file_size_display() {
    let size = FileSize::new(50.0, FileUnit::Kb);
    assert_eq!(size.to_string(), "50.000000KB");
}

#[test]
fn test_toggle_options() {
    let registry = OptionRegistry::new();
    let options = registry.parse_segments(["p", "f", "g"]).unwrap();
    assert!(options.ssl);
    assert!(options.force_reload);
    assert!(options.grayscale);
    assert!(options.file_size.is_none());
    assert!(options.quality.is_none());
    assert!(options.resize.is_none());
}

#[test]
fn test_long_prefixes() {
    let registry = OptionRegistry::new();
    let options = registry
        .parse_segments(["-filesize2mb", "-ssl", "-force", "-gray", "-quality80", "-resize50x"])
        .unwrap();
    assert_eq!(options.file_size, Some(FileSize::new(2.0, FileUnit::Mb)));
    assert!(options.ssl);
    assert!(options.force_reload);
    assert!(options.grayscale);
    assert_eq!(options.quality, Some(80.0));
    assert_eq!(options.resize, Some(ResizeSpec::Width(50)));
}

#[test]
fn test_quality_option() {
    let registry = OptionRegistry::new();
    let options = registry.parse_segments(["q72.5"]).unwrap();
    assert_eq!(options.quality, Some(72.5));
}

#[test]
fn test_resize_option_uses_grammar() {
    let registry = OptionRegistry::new();
    let options = registry.parse_segments(["r100x200"]).unwrap();
    assert_eq!(
        options.resize,
        Some(ResizeSpec::Both {
            width: 100,
            height: 200
        })
    );

    assert!(registry.parse_segments(["rx"]).is_err());
}

#[test]
fn test_unknown_option_rejected() {
    let registry = OptionRegistry::new();
    let err = registry.parse_segments(["-bogus"]).unwrap_err();
    assert!(matches!(err, Error::UnknownOption(ref seg) if seg == "-bogus"));
}

#[test]
fn test_first_failure_short_circuits() {
    let registry = OptionRegistry::new();
    let err = registry.parse_segments(["g", "qnope", "p"]).unwrap_err();
    assert!(matches!(err, Error::InvalidNumber(_)));
}
