use std::fmt;

use crate::error::Error;
use crate::resize::{self, ResizeSpec};

/// Unit suffix of a file-size cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileUnit {
    B,
    Kb,
    Mb,
    Gb,
}

impl FileUnit {
    /// Unrecognized suffixes fall back to kilobytes.
    fn parse(suffix: &str) -> Self {
        match suffix.to_ascii_lowercase().as_str() {
            "b" => FileUnit::B,
            "kb" => FileUnit::Kb,
            "mb" => FileUnit::Mb,
            "gb" => FileUnit::Gb,
            _ => FileUnit::Kb,
        }
    }
}

impl fmt::Display for FileUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self {
            FileUnit::B => "B",
            FileUnit::Kb => "KB",
            FileUnit::Mb => "MB",
            FileUnit::Gb => "GB",
        };
        f.write_str(unit)
    }
}

/// A file-size ceiling such as `2.5MB`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FileSize {
    pub value: f64,
    pub unit: FileUnit,
}

impl FileSize {
    pub const fn new(value: f64, unit: FileUnit) -> Self {
        Self { value, unit }
    }
}

impl fmt::Display for FileSize {
    // Rendered exactly as ImageMagick expects it in `jpeg:extent=`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}{}", self.value, self.unit)
    }
}

/// Parse a file size: a leading numeric literal (digits and at most one
/// decimal point) followed by a unit suffix.
pub fn parse_file_size(arg: &str) -> Result<FileSize, Error> {
    let split = arg
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(arg.len());
    let value = arg[..split]
        .parse::<f64>()
        .map_err(|_| Error::InvalidNumber(arg.to_string()))?;
    Ok(FileSize::new(value, FileUnit::parse(&arg[split..])))
}

/// Options parsed from a request's path segments.
///
/// Presence is the `Option`-ness of the typed fields; an absent option
/// carries no value at all.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub file_size: Option<FileSize>,
    pub quality: Option<f64>,
    pub resize: Option<ResizeSpec>,
    pub ssl: bool,
    pub force_reload: bool,
    pub grayscale: bool,
}

type Handler = fn(&mut RequestOptions, &str) -> Result<(), Error>;

/// Table mapping option prefixes to their parsing functions.
///
/// Scanning is first-match in registration order, so registered prefixes
/// must be pairwise disjoint; longest-match is not attempted.
pub struct OptionRegistry {
    entries: Vec<(&'static str, Handler)>,
}

impl OptionRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            entries: Vec::new(),
        };
        registry.add(set_file_size, &["s", "-size", "-filesize"]);
        registry.add(set_ssl, &["p", "-ssl"]);
        registry.add(set_force_reload, &["f", "-force"]);
        registry.add(set_grayscale, &["g", "-gray"]);
        registry.add(set_quality, &["q", "-quality"]);
        registry.add(set_resize, &["r", "-resize"]);
        registry
    }

    fn add(&mut self, handler: Handler, prefixes: &[&'static str]) {
        for prefix in prefixes {
            self.entries.push((prefix, handler));
        }
    }

    /// Parse a single path segment into `options`.
    pub fn apply(&self, options: &mut RequestOptions, segment: &str) -> Result<(), Error> {
        for (prefix, handler) in &self.entries {
            if let Some(rest) = segment.strip_prefix(prefix) {
                return handler(options, rest);
            }
        }
        Err(Error::UnknownOption(segment.to_string()))
    }

    /// Parse all option segments of a request, in order, short-circuiting on
    /// the first failure.
    pub fn parse_segments<'a>(
        &self,
        segments: impl IntoIterator<Item = &'a str>,
    ) -> Result<RequestOptions, Error> {
        let mut options = RequestOptions::default();
        for segment in segments {
            self.apply(&mut options, segment)?;
        }
        Ok(options)
    }
}

impl Default for OptionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn set_file_size(options: &mut RequestOptions, arg: &str) -> Result<(), Error> {
    options.file_size = Some(parse_file_size(arg)?);
    Ok(())
}

fn set_quality(options: &mut RequestOptions, arg: &str) -> Result<(), Error> {
    let quality = arg
        .parse::<f64>()
        .map_err(|_| Error::InvalidNumber(arg.to_string()))?;
    options.quality = Some(quality);
    Ok(())
}

fn set_resize(options: &mut RequestOptions, arg: &str) -> Result<(), Error> {
    options.resize = Some(resize::parse_resize(arg)?);
    Ok(())
}

fn set_ssl(options: &mut RequestOptions, _arg: &str) -> Result<(), Error> {
    options.ssl = true;
    Ok(())
}

fn set_force_reload(options: &mut RequestOptions, _arg: &str) -> Result<(), Error> {
    options.force_reload = true;
    Ok(())
}

fn set_grayscale(options: &mut RequestOptions, _arg: &str) -> Result<(), Error> {
    options.grayscale = true;
    Ok(())
}
