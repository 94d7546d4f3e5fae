//! A compressed on-disk cache of parsed language sources.
//!
//! A cache file is a gzip stream holding a header line `xdg-grammar-cache <version>` followed by
//! the [`LanguageSource`] as JSON.
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use log::debug;
use log::info;
use log::warn;

use crate::format::LanguageSource;
use crate::GrammarError;

/// Bumped whenever the layout of [`LanguageSource`] changes.
pub const FORMAT_VERSION: u32 = 1;

const MAGIC: &str = "xdg-grammar-cache";

#[derive(Clone, Debug)]
pub struct GrammarCache {
    directory: PathBuf,
}

impl GrammarCache {
    pub fn new(directory: impl Into<PathBuf>) -> GrammarCache {
        GrammarCache {
            directory: directory.into(),
        }
    }

    /// The cache file of `language` in the grammar `grammar_name`.
    pub fn path(&self, language: &str, grammar_name: &str) -> PathBuf {
        self.directory
            .join(format!("{language}-{grammar_name}.xdgc"))
    }

    /// Return the cached source of `language`, or parse `language_file` and `lexicon_files` when
    /// the cache is missing, stale or of another format version.
    ///
    /// Only parsing errors are returned; a cache that cannot be read or written is logged and
    /// bypassed.
    pub fn load_or_parse(
        &self,
        language: &str,
        grammar_name: &str,
        language_file: &Path,
        lexicon_files: &[&Path],
    ) -> Result<LanguageSource, GrammarError> {
        let path = self.path(language, grammar_name);
        let sources = std::iter::once(language_file).chain(lexicon_files.iter().copied());

        if is_fresh(&path, sources) {
            match read(&path) {
                Ok(source) => {
                    debug!("loaded `{language}` from cache `{}`", path.display());
                    return Ok(source);
                }
                Err(error) => info!("rebuilding grammar cache: {error}"),
            }
        }

        let source = LanguageSource::read(language_file, lexicon_files)?;
        if let Err(error) = write(&path, &source) {
            warn!("failed to write grammar cache: {error}");
        }
        Ok(source)
    }
}

/// Whether `path` exists and no source file was modified after it.
fn is_fresh<'a>(path: &Path, mut sources: impl Iterator<Item = &'a Path>) -> bool {
    let Ok(cached_at) = modified(path) else {
        return false;
    };
    sources.all(|source| match modified(source) {
        Ok(modified_at) if modified_at <= cached_at => true,
        Ok(_) => {
            info!("grammar cache `{}` is stale", path.display());
            false
        }
        Err(_) => false,
    })
}

fn modified(path: &Path) -> std::io::Result<SystemTime> {
    path.metadata()?.modified()
}

fn read(path: &Path) -> Result<LanguageSource, GrammarError> {
    let file = File::open(path).map_err(|error| GrammarError::io(path, error))?;
    let mut reader = BufReader::new(GzDecoder::new(file));

    let mut header = String::new();
    let _ = reader
        .read_line(&mut header)
        .map_err(|error| GrammarError::io(path, error))?;
    let header = header.trim_end();
    if header != format!("{MAGIC} {FORMAT_VERSION}") {
        return Err(GrammarError::CacheFormat {
            path: path.to_owned(),
            found: header.to_owned(),
            expected: FORMAT_VERSION,
        });
    }

    Ok(serde_json::from_reader(reader)?)
}

fn write(path: &Path, source: &LanguageSource) -> Result<(), GrammarError> {
    if let Some(directory) = path.parent() {
        std::fs::create_dir_all(directory).map_err(|error| GrammarError::io(directory, error))?;
    }
    let file = File::create(path).map_err(|error| GrammarError::io(path, error))?;
    let mut writer = BufWriter::new(GzEncoder::new(file, Compression::default()));

    writeln!(writer, "{MAGIC} {FORMAT_VERSION}").map_err(|error| GrammarError::io(path, error))?;
    serde_json::to_writer(&mut writer, source)?;

    let _ = writer
        .into_inner()
        .map_err(|error| GrammarError::io(path, error.into_error()))?
        .finish()
        .map_err(|error| GrammarError::io(path, error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::io::Write;
    use std::path::Path;
    use std::time::Duration;
    use std::time::SystemTime;

    use flate2::write::GzEncoder;
    use flate2::Compression;

    use super::write;
    use super::GrammarCache;
    use crate::format::LanguageSource;

    fn language_file(directory: &Path, name: &str) -> std::path::PathBuf {
        let path = directory.join("eng.json");
        std::fs::write(
            &path,
            format!(r#"{{ "abbrev": "eng", "name": "{name}", "dimensions": [] }}"#),
        )
        .expect("writable");
        path
    }

    #[test]
    fn a_fresh_cache_is_used_instead_of_the_sources() {
        let directory = tempfile::tempdir().expect("temporary directory");
        let source = language_file(directory.path(), "English");
        let cache = GrammarCache::new(directory.path().join("cache"));

        let parsed = cache
            .load_or_parse("eng", "toy", &source, &[])
            .expect("parsable");
        assert_eq!(parsed.name, "English");
        assert!(cache.path("eng", "toy").exists());

        let mut cached = parsed.clone();
        cached.name = "Cached English".to_owned();
        write(&cache.path("eng", "toy"), &cached).expect("writable");

        let loaded = cache
            .load_or_parse("eng", "toy", &source, &[])
            .expect("parsable");
        assert_eq!(loaded.name, "Cached English");
    }

    #[test]
    fn a_stale_cache_is_rebuilt() {
        let directory = tempfile::tempdir().expect("temporary directory");
        let source = language_file(directory.path(), "English");
        let cache = GrammarCache::new(directory.path());

        let mut cached: LanguageSource = cache
            .load_or_parse("eng", "toy", &source, &[])
            .expect("parsable");
        cached.name = "Cached English".to_owned();
        write(&cache.path("eng", "toy"), &cached).expect("writable");

        File::options()
            .write(true)
            .open(&source)
            .expect("existing")
            .set_modified(SystemTime::now() + Duration::from_secs(60))
            .expect("settable modification time");

        let loaded = cache
            .load_or_parse("eng", "toy", &source, &[])
            .expect("parsable");
        assert_eq!(loaded.name, "English");
    }

    #[test]
    fn a_cache_of_another_version_is_rebuilt() {
        let directory = tempfile::tempdir().expect("temporary directory");
        let source = language_file(directory.path(), "English");
        let cache = GrammarCache::new(directory.path());

        let mut encoder = GzEncoder::new(
            File::create(cache.path("eng", "toy")).expect("creatable"),
            Compression::default(),
        );
        writeln!(encoder, "xdg-grammar-cache 0").expect("writable");
        write!(encoder, r#"{{ "abbrev": "eng", "name": "Old", "dimensions": [] }}"#)
            .expect("writable");
        let _ = encoder.finish().expect("writable");

        let loaded = cache
            .load_or_parse("eng", "toy", &source, &[])
            .expect("parsable");
        assert_eq!(loaded.name, "English");
        assert_eq!(
            super::read(&cache.path("eng", "toy")).expect("rewritten").name,
            "English"
        );
    }
}
