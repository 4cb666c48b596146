use glob::{glob, Pattern};
use log::{debug, error, info, warn};
use std::error;
use std::fmt;
use std::fs;
use std::io::{self, Error, ErrorKind};
use std::path::{Path, PathBuf};
use std::process::Command;

use super::family::IconFamily;
use super::record::IconRecord;

/// Settings for a batch extraction run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExtractOptions {
    /// Directory searched, recursively, for `.icns` files.
    pub source: PathBuf,
    /// Directory the extracted images are written to.  It must not exist
    /// yet; it is created once at least one ICNS file has been found.
    pub output: PathBuf,
    /// Whether to hand ICNS files that yield no images to a fallback
    /// converter (see [`Fallback`](trait.Fallback.html)).
    pub fallback: bool,
}

impl ExtractOptions {
    /// Checks that the source directory exists and that the output path
    /// does not.
    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.source.as_os_str().is_empty() || !self.source.is_dir() {
            return Err(ExtractError::InvalidSource(self.source.clone()));
        }
        if self.output.as_os_str().is_empty() || self.output.exists() {
            return Err(ExtractError::InvalidOutput(self.output.clone()));
        }
        Ok(())
    }
}

/// A reason a batch extraction run could not start.
#[derive(Debug)]
pub enum ExtractError {
    /// The source path is empty or not an existing directory.
    InvalidSource(PathBuf),
    /// The output path is empty or already exists.
    InvalidOutput(PathBuf),
    /// The source directory contains no `.icns` files.
    NoIcnsFiles(PathBuf),
    /// Searching the source directory or creating the output directory
    /// failed.
    Io(io::Error),
}

impl ExtractError {
    /// Returns the process exit status that reports this error.
    pub fn exit_code(&self) -> i32 {
        match *self {
            ExtractError::InvalidSource(_) => 2,
            ExtractError::InvalidOutput(_) => 3,
            ExtractError::NoIcnsFiles(_) => 4,
            ExtractError::Io(_) => 1,
        }
    }
}

impl fmt::Display for ExtractError {
    fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ExtractError::InvalidSource(ref path) => {
                write!(out,
                       "input path {:?} is invalid or does not exist",
                       path)
            }
            ExtractError::InvalidOutput(ref path) => {
                write!(out,
                       "output path {:?} is invalid or already exists",
                       path)
            }
            ExtractError::NoIcnsFiles(ref path) => {
                write!(out, "no .icns files found under {:?}", path)
            }
            ExtractError::Io(ref err) => write!(out, "{}", err),
        }
    }
}

impl error::Error for ExtractError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            ExtractError::Io(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ExtractError {
    fn from(err: io::Error) -> ExtractError {
        ExtractError::Io(err)
    }
}

/// Counters describing a finished batch extraction run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ExtractSummary {
    /// Number of ICNS files processed.
    pub files: usize,
    /// Number of distinct images written to the output directory.
    pub images: usize,
    /// Number of images that replaced an earlier image with the same output
    /// name (e.g. from two source files with the same stem).
    pub overwritten: usize,
    /// Number of ICNS files handed to the fallback converter successfully.
    pub converted: usize,
    /// Number of ICNS files that could not be read or parsed, plus the
    /// number of images and fallback conversions that could not be written.
    pub errors: usize,
    /// Number of ICNS files that produced no output at all.
    pub empty: usize,
}

impl ExtractSummary {
    /// Returns 0 if every file produced output without errors, or 5
    /// otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.errors == 0 && self.empty == 0 {
            0
        } else {
            5
        }
    }
}

/// An external converter for ICNS files that the parser extracts nothing
/// from (for example, files without a table of contents).
pub trait Fallback {
    /// Returns a short name for log messages.
    fn name(&self) -> &str;

    /// Converts the ICNS file at `source` into a PNG file at `output`.
    fn convert(&self, source: &Path, output: &Path) -> io::Result<()>;
}

/// Converts ICNS files with the `sips` tool that ships with macOS.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sips;

impl Fallback for Sips {
    fn name(&self) -> &str {
        "sips"
    }

    fn convert(&self, source: &Path, output: &Path) -> io::Result<()> {
        let result = Command::new("sips")
            .args(["-s", "format", "png"])
            .arg(source)
            .arg("--out")
            .arg(output)
            .output()?;
        for line in String::from_utf8_lossy(&result.stdout).lines() {
            debug!("sips: {}", line);
        }
        for line in String::from_utf8_lossy(&result.stderr).lines() {
            warn!("sips: {}", line);
        }
        if !result.status.success() {
            let msg = format!("sips failed ({})", result.status);
            return Err(Error::new(ErrorKind::Other, msg));
        }
        Ok(())
    }
}

/// Extracts the images from every ICNS file under a directory.
pub struct Extractor {
    options: ExtractOptions,
    fallback: Option<Box<dyn Fallback>>,
}

impl Extractor {
    /// Creates an extractor.  If `options.fallback` is set and this is macOS,
    /// files that yield no images are converted with
    /// [`Sips`](struct.Sips.html).
    pub fn new(options: ExtractOptions) -> Extractor {
        let fallback: Option<Box<dyn Fallback>> =
            if options.fallback && cfg!(target_os = "macos") {
                Some(Box::new(Sips))
            } else {
                None
            };
        Extractor { options, fallback }
    }

    /// Replaces the fallback converter.  Has no effect unless
    /// `options.fallback` is set.
    pub fn with_fallback(mut self, fallback: Box<dyn Fallback>) -> Extractor {
        if self.options.fallback {
            self.fallback = Some(fallback);
        }
        self
    }

    /// Returns the options this extractor was created with.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Validates the options, then extracts every ICNS file found.  Failures
    /// within individual files are logged and counted in the summary; they
    /// never stop the batch.
    pub fn run(&self) -> Result<ExtractSummary, ExtractError> {
        self.options.validate()?;
        let files = find_icns_files(&self.options.source)?;
        if files.is_empty() {
            return Err(ExtractError::NoIcnsFiles(self.options
                                                     .source
                                                     .clone()));
        }
        fs::create_dir_all(&self.options.output)?;
        let mut summary = ExtractSummary::default();
        for (index, path) in files.iter().enumerate() {
            info!("parsing file {} of {}: {}",
                  index + 1,
                  files.len(),
                  path.display());
            self.extract_file(path, &mut summary);
        }
        info!("extracted {} images from {} ICNS files ({} errors)",
              summary.images,
              summary.files,
              summary.errors);
        Ok(summary)
    }

    /// Extracts the images from one ICNS file into the output directory,
    /// recording the outcome in `summary`.
    pub fn extract_file(&self, path: &Path, summary: &mut ExtractSummary) {
        summary.files += 1;
        let family = match fs::read(path).and_then(|bytes| {
            IconFamily::parse(&bytes)
        }) {
            Ok(family) => family,
            Err(err) => {
                error!("failed to parse source file {}: {}",
                       path.display(),
                       err);
                summary.errors += 1;
                return;
            }
        };
        let stem = file_stem(path);
        if family.is_empty() {
            warn!("no compatible images in {}", path.display());
            self.fall_back(path, &stem, summary);
            return;
        }
        let mut written = 0;
        let mut overwritten = 0;
        for record in family.extractable() {
            let name = match output_file_name(&stem, record) {
                Some(name) => name,
                None => continue,
            };
            #[cfg(feature = "pngio")]
            check_png_dimensions(path, record);
            let out_path = self.options.output.join(name);
            let existed = out_path.exists();
            match fs::write(&out_path, record.data()) {
                Ok(()) => {
                    if existed {
                        warn!("'{}' image from {} overwrote {}",
                              record.ostype(),
                              path.display(),
                              out_path.display());
                        overwritten += 1;
                    } else {
                        debug!("wrote {}", out_path.display());
                    }
                    written += 1;
                }
                Err(err) => {
                    error!("failed to save type {} from source file {}: {}",
                           record.ostype(),
                           path.display(),
                           err);
                    summary.errors += 1;
                }
            }
        }
        if written == 0 {
            warn!("nothing extracted from {}", path.display());
            summary.empty += 1;
        }
        summary.images += written - overwritten;
        summary.overwritten += overwritten;
    }

    fn fall_back(&self,
                 path: &Path,
                 stem: &str,
                 summary: &mut ExtractSummary) {
        let fallback = match self.fallback {
            Some(ref fallback) => fallback,
            None => {
                summary.empty += 1;
                return;
            }
        };
        info!("falling back to {}", fallback.name());
        let out_path = self.options.output.join(format!("{}.png", stem));
        match fallback.convert(path, &out_path) {
            Ok(()) => summary.converted += 1,
            Err(err) => {
                error!("{} could not convert {}: {}",
                       fallback.name(),
                       path.display(),
                       err);
                summary.errors += 1;
            }
        }
    }
}

/// Returns the name an extracted image is saved under:
/// `<stem>_<ostype>_<width>x<height>.<extension>`.  Returns `None` if the
/// record's payload format is unknown.
pub fn output_file_name(stem: &str, record: &IconRecord) -> Option<String> {
    let extension = record.format().extension()?;
    Some(format!("{}_{}_{}x{}.{}",
                 stem,
                 record.ostype(),
                 record.width(),
                 record.height(),
                 extension))
}

/// Lists the `.icns` files under `dir` (recursively), in descending path
/// order.
fn find_icns_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let pattern = format!("{}/**/*.icns",
                          Pattern::escape(&dir.to_string_lossy()));
    let entries = glob(&pattern).map_err(|err| {
        Error::new(ErrorKind::InvalidInput, err.to_string())
    })?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(io::Error::from)?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| b.cmp(a));
    Ok(files)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(feature = "pngio")]
fn check_png_dimensions(path: &Path, record: &IconRecord) {
    if record.format() != super::format::ImageFormat::Png {
        return;
    }
    match record.png_dimensions() {
        Ok((width, height)) => {
            if (width, height) != (record.width(), record.height()) {
                warn!("'{}' image in {} is {}x{}, not {}x{}",
                      record.ostype(),
                      path.display(),
                      width,
                      height,
                      record.width(),
                      record.height());
            }
        }
        Err(err) => {
            warn!("'{}' image in {} has a bad PNG header: {}",
                  record.ostype(),
                  path.display(),
                  err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icontype::IconType;
    use std::cell::RefCell;
    use std::env;
    use std::rc::Rc;

    struct ScratchDir(PathBuf);

    impl ScratchDir {
        fn new(name: &str) -> ScratchDir {
            let path = env::temp_dir().join(format!("icns-extract-{}-{}",
                                                    name,
                                                    std::process::id()));
            let _ = fs::remove_dir_all(&path);
            fs::create_dir_all(&path).unwrap();
            ScratchDir(path)
        }
    }

    impl Drop for ScratchDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    struct RecordingFallback(Rc<RefCell<Vec<(PathBuf, PathBuf)>>>);

    impl Fallback for RecordingFallback {
        fn name(&self) -> &str {
            "recording"
        }

        fn convert(&self, source: &Path, output: &Path) -> io::Result<()> {
            self.0
                .borrow_mut()
                .push((source.to_path_buf(), output.to_path_buf()));
            Ok(())
        }
    }

    /// A container with a PNG `ic11` payload, a JPEG `ic07` payload, and an
    /// unsupported `is32` record.
    const TWO_IMAGES: &[u8] = b"icns\0\0\0\0TOC \0\0\0\x18\
                                ic11\0\0\0\x04is32\0\0\0\x02ic07\0\0\0\x03\
                                \x89PNG\0\0\xff\xd8\xff";

    fn options(scratch: &ScratchDir, fallback: bool) -> ExtractOptions {
        ExtractOptions {
            source: scratch.0.join("in"),
            output: scratch.0.join("out"),
            fallback,
        }
    }

    #[test]
    fn file_names() {
        let record = IconRecord::new(IconType::RGBA32_16x16_2x,
                                     b"\x89PNG".to_vec());
        assert_eq!(output_file_name("app", &record),
                   Some("app_ic11_32x32.png".to_string()));
        let record = IconRecord::new(IconType::RGBA32_24x24_2x,
                                     b"\xff\xd8\xff".to_vec());
        assert_eq!(output_file_name("app", &record),
                   Some("app_SB24_48x48.jpeg".to_string()));
        let record = IconRecord::new(IconType::RGBA32_256x256, Vec::new());
        assert_eq!(output_file_name("app", &record), None);
    }

    #[test]
    fn validate_options() {
        let scratch = ScratchDir::new("validate");
        let opts = options(&scratch, false);
        assert_eq!(opts.validate().unwrap_err().exit_code(), 2);
        fs::create_dir(&opts.source).unwrap();
        assert!(opts.validate().is_ok());
        fs::create_dir(&opts.output).unwrap();
        assert_eq!(opts.validate().unwrap_err().exit_code(), 3);
    }

    #[test]
    fn no_icns_files() {
        let scratch = ScratchDir::new("nofiles");
        let opts = options(&scratch, false);
        fs::create_dir(&opts.source).unwrap();
        fs::write(opts.source.join("readme.txt"), b"hello").unwrap();
        let err = Extractor::new(opts.clone()).run().unwrap_err();
        assert_eq!(err.exit_code(), 4);
        assert!(!opts.output.exists());
    }

    #[test]
    fn extract_batch() {
        let scratch = ScratchDir::new("batch");
        let opts = options(&scratch, false);
        fs::create_dir_all(opts.source.join("nested")).unwrap();
        fs::write(opts.source.join("nested/app.icns"), TWO_IMAGES).unwrap();
        fs::write(opts.source.join("bad.icns"),
                  b"icns\0\0\0\0TOC \0\0\0\x07")
            .unwrap();
        let summary = Extractor::new(opts.clone()).run().unwrap();
        assert_eq!(summary.files, 2);
        assert_eq!(summary.images, 2);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.empty, 0);
        assert_eq!(summary.exit_code(), 5);
        let png = fs::read(opts.output.join("app_ic11_32x32.png")).unwrap();
        assert_eq!(png, b"\x89PNG");
        let jpeg = fs::read(opts.output.join("app_ic07_128x128.jpeg"))
            .unwrap();
        assert_eq!(jpeg, b"\xff\xd8\xff");
    }

    #[test]
    fn empty_container_uses_fallback() {
        let scratch = ScratchDir::new("fallback");
        let opts = options(&scratch, true);
        fs::create_dir(&opts.source).unwrap();
        let source_file = opts.source.join("legacy.icns");
        fs::write(&source_file, b"icns\0\0\0\x08").unwrap();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let extractor = Extractor::new(opts.clone())
            .with_fallback(Box::new(RecordingFallback(calls.clone())));
        assert_eq!(extractor.options(), &opts);
        let summary = extractor.run().unwrap();
        assert_eq!(summary.converted, 1);
        assert_eq!(summary.exit_code(), 0);
        assert_eq!(*calls.borrow(),
                   vec![(source_file, opts.output.join("legacy.png"))]);
    }

    #[test]
    fn empty_container_without_fallback() {
        let scratch = ScratchDir::new("nofallback");
        let opts = options(&scratch, false);
        fs::create_dir(&opts.source).unwrap();
        fs::write(opts.source.join("legacy.icns"), b"icns\0\0\0\x08")
            .unwrap();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let extractor = Extractor::new(opts)
            .with_fallback(Box::new(RecordingFallback(calls.clone())));
        let summary = extractor.run().unwrap();
        assert_eq!(summary.empty, 1);
        assert_eq!(summary.exit_code(), 5);
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn same_stem_in_two_directories() {
        let scratch = ScratchDir::new("samestem");
        let opts = options(&scratch, false);
        fs::create_dir_all(opts.source.join("a")).unwrap();
        fs::create_dir_all(opts.source.join("b")).unwrap();
        let input: &[u8] = b"icns\0\0\0\0TOC \0\0\0\x08\
                             ic11\0\0\0\x04\x89PNG";
        fs::write(opts.source.join("a/app.icns"), input).unwrap();
        fs::write(opts.source.join("b/app.icns"), input).unwrap();
        let summary = Extractor::new(opts.clone()).run().unwrap();
        assert_eq!(summary.files, 2);
        assert_eq!(summary.images, 1);
        assert_eq!(summary.overwritten, 1);
        assert_eq!(summary.empty, 0);
        assert_eq!(fs::read_dir(&opts.output).unwrap().count(), 1);
    }

    #[test]
    fn files_are_processed_in_descending_order() {
        let scratch = ScratchDir::new("order");
        let dir = scratch.0.join("in");
        fs::create_dir_all(dir.join("b")).unwrap();
        for name in &["a.icns", "c.icns", "b/z.icns", "d.png"] {
            fs::write(dir.join(name), b"").unwrap();
        }
        let files = find_icns_files(&dir).unwrap();
        assert_eq!(files,
                   vec![dir.join("c.icns"),
                        dir.join("b/z.icns"),
                        dir.join("a.icns")]);
    }
}
