use std::path::Path;

use crate::request::Request;
use crate::resize::ResizeSpec;

/// The external transformation tool: ImageMagick's `convert`.
pub const CONVERT_PROGRAM: &str = "convert";

/// Output token asking `convert` to emit JPEG bytes on stdout.
pub const OUTPUT_TOKEN: &str = "jpeg:-";

/// Build the `convert` argument list for a request whose original bytes live
/// at `original`.
///
/// Flags appear in a fixed order (file size, grayscale, quality, resize) so
/// the same request always produces the same command line.
pub fn convert_args(request: &Request, original: &Path) -> Vec<String> {
    let options = &request.options;
    let mut args = Vec::new();

    if let Some(file_size) = options.file_size {
        args.push("-define".to_string());
        args.push(format!("jpeg:extent={file_size}"));
    }
    if options.grayscale {
        args.push("-colorspace".to_string());
        args.push("Gray".to_string());
    }
    if let Some(quality) = options.quality {
        args.push("-quality".to_string());
        args.push(format!("{quality:.6}%"));
    }
    if let Some(resize) = options.resize {
        args.push("-resize".to_string());
        args.push(match resize {
            ResizeSpec::Width(width) => format!("{width}x"),
            ResizeSpec::Height(height) => format!("x{height}"),
            ResizeSpec::Both { width, height } => format!("{width}x{height}"),
            ResizeSpec::Percentage(percentage) => format!("{percentage:.6}%"),
        });
    }

    args.push(original.display().to_string());
    args.push(OUTPUT_TOKEN.to_string());
    args
}
