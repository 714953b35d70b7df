use super::Result;
use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};
use url::Url;

/// A readable input file given either as a plain path or as a `file://` URL
#[derive(Clone, PartialEq)]
pub struct InputSource {
    path: PathBuf,
}

impl InputSource {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_stem(&self) -> Option<String> {
        self.path.file_stem()?.to_str().map(|s| s.to_owned())
    }

    pub fn format_error(&self, context: &str, error: impl fmt::Display) -> String {
        format!("{} {}: {}", context, self, error)
    }

    pub fn preflight_checks(&self) -> Result<()> {
        let metadata = std::fs::metadata(&self.path)
            .map_err(|e| self.format_error("Cannot access input", e))?;
        if metadata.is_dir() {
            return Err(format!("Expected a file but found a directory: {}", self));
        }
        if metadata.len() == 0 {
            log::warn!("Input file {} is empty", self);
        }
        Ok(())
    }
}

impl FromStr for InputSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self> {
        if let Ok(url) = Url::parse(s) {
            match url.scheme() {
                "file" => {
                    let p = url
                        .to_file_path()
                        .map_err(|_| "Bad file:// URL".to_string())?;
                    return if p.exists() {
                        Ok(InputSource { path: p })
                    } else {
                        Err(format!("File does not exist: {}", p.display()))
                    };
                }
                "http" | "https" | "s3" | "gs" | "gcs" | "ftp" => {
                    return Err(format!(
                        "Remote inputs are not supported ({}), download the file first",
                        url.scheme()
                    ));
                }
                // Windows drive letters parse as a one-letter scheme
                _ => {}
            }
        }

        let p = Path::new(s);
        if p.exists() {
            Ok(InputSource {
                path: p.to_path_buf(),
            })
        } else {
            Err(format!("File does not exist: {}", p.display()))
        }
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl fmt::Debug for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("InputSource").field(&self.path).finish()
    }
}

pub trait PreflightExt {
    fn preflight_ext(&self) -> Result<()>;
}

impl PreflightExt for InputSource {
    #[inline]
    fn preflight_ext(&self) -> Result<()> {
        self.preflight_checks()
    }
}

impl PreflightExt for Option<InputSource> {
    #[inline]
    fn preflight_ext(&self) -> Result<()> {
        if let Some(inner) = self {
            inner.preflight_checks()?;
        }
        Ok(())
    }
}

#[macro_export]
macro_rules! preflight_fields {
    ($args:expr, $($field:ident),+ $(,)?) => {{
        use $crate::utils::input_source::PreflightExt as _;
        $( ($args).$field.preflight_ext()?; )+
        Ok::<(), std::string::String>(())
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn local_path_must_exist() {
        let err = InputSource::from_str("/definitely/not/here.tsv").unwrap_err();
        assert_eq!(err, "File does not exist: /definitely/not/here.tsv");
    }

    #[test]
    fn existing_local_path_is_accepted() {
        let file = NamedTempFile::new().unwrap();
        let src = InputSource::from_str(file.path().to_str().unwrap()).unwrap();
        assert_eq!(src.path(), file.path());
    }

    #[test]
    fn file_url_is_resolved_to_path() {
        let file = NamedTempFile::new().unwrap();
        let url = Url::from_file_path(file.path()).unwrap();
        let src = InputSource::from_str(url.as_str()).unwrap();
        assert_eq!(src.path(), file.path());
    }

    #[test]
    fn remote_schemes_are_rejected() {
        let err = InputSource::from_str("https://example.com/profiles.tsv").unwrap_err();
        assert!(err.starts_with("Remote inputs are not supported (https)"));
        assert!(InputSource::from_str("s3://bucket/tree.nwk").is_err());
    }

    #[test]
    fn directory_fails_preflight() {
        let dir = tempdir().unwrap();
        let src = InputSource::from_str(dir.path().to_str().unwrap()).unwrap();
        assert!(src.preflight_checks().is_err());
    }

    #[test]
    fn file_stem_drops_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cgmlst.tsv");
        std::fs::write(&path, "x").unwrap();
        let src = InputSource::from_str(path.to_str().unwrap()).unwrap();
        assert_eq!(src.file_stem().as_deref(), Some("cgmlst"));
    }
}
