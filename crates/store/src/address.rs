//! Cache addresses derived from source URLs
//!
//! The layout is owned by apko: `{escaped prefix}/{arch}/{file}`, where the
//! prefix is the URL without its last one (no arch) or two (arch) segments,
//! escaped like Go's `url.QueryEscape`. Short prefixes of three or fewer
//! components get a trailing `/` before escaping. This is a frozen contract;
//! the literal cases in the tests below must keep passing.

use apkfetch_types::PackageReference;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt;
use std::path::PathBuf;

/// Everything except `A-Z a-z 0-9 - _ . ~`
const QUERY_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Escape `input` the way Go's `url.QueryEscape` does (space becomes `+`)
#[must_use]
pub fn query_escape(input: &str) -> String {
    utf8_percent_encode(input, QUERY_ESCAPE)
        .to_string()
        .replace("%20", "+")
}

/// Escape a repository prefix, adding the trailing `/` short prefixes get
fn escape_prefix(prefix: &str) -> String {
    let components = prefix.split('/').filter(|c| !c.is_empty()).count();
    if components <= 3 {
        query_escape(&format!("{prefix}/"))
    } else {
        query_escape(prefix)
    }
}

/// Cache-relative location of one artifact
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheAddress {
    escaped_prefix: String,
    architecture: Option<String>,
    file_name: String,
}

impl CacheAddress {
    #[must_use]
    pub fn escaped_prefix(&self) -> &str {
        &self.escaped_prefix
    }

    #[must_use]
    pub fn architecture(&self) -> Option<&str> {
        self.architecture.as_deref()
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Same prefix and architecture, different file
    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    #[must_use]
    pub fn relative_path(&self) -> PathBuf {
        let mut path = PathBuf::from(&self.escaped_prefix);
        if let Some(arch) = &self.architecture {
            path.push(arch);
        }
        for part in self.file_name.split('/') {
            path.push(part);
        }
        path
    }
}

impl fmt::Display for CacheAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.escaped_prefix)?;
        if let Some(arch) = &self.architecture {
            write!(f, "/{arch}")?;
        }
        write!(f, "/{}", self.file_name)
    }
}

/// Derives cache addresses from URLs
pub struct AddressTranslator;

impl AddressTranslator {
    /// Address of `url`, keeping the URL's own file name
    ///
    /// With `arch`, the segment before the file name is taken to be the
    /// architecture directory and replaced by `arch` in the address.
    #[must_use]
    pub fn translate(url: &str, arch: Option<&str>) -> CacheAddress {
        let file_name = url.rsplit_once('/').map_or(url, |(_, file_name)| file_name);
        CacheAddress {
            escaped_prefix: escape_prefix(Self::repository_of(url, arch)),
            architecture: arch.map(str::to_string),
            file_name: file_name.to_string(),
        }
    }

    /// Repository part of `url`: the URL without its file name, and also
    /// without the architecture directory when `arch` is given
    #[must_use]
    pub fn repository_of<'a>(url: &'a str, arch: Option<&str>) -> &'a str {
        let rest = url.rsplit_once('/').map_or("", |(rest, _)| rest);
        match arch {
            Some(_) => rest.rsplit_once('/').map_or("", |(prefix, _)| prefix),
            None => rest,
        }
    }

    /// `{prefix}/{arch}/{name}-{version}.apk` below the reference's repository
    #[must_use]
    pub fn package(reference: &PackageReference) -> CacheAddress {
        CacheAddress {
            escaped_prefix: escape_prefix(reference.repository_url.trim_end_matches('/')),
            architecture: Some(reference.architecture.clone()),
            file_name: reference.file_name(),
        }
    }

    /// `{prefix}/{arch}/APKINDEX/latest.tar.gz` for an `APKINDEX.tar.gz` URL
    #[must_use]
    pub fn index(url: &str, arch: &str) -> CacheAddress {
        Self::translate(url, Some(arch)).with_file_name("APKINDEX/latest.tar.gz")
    }

    /// `{prefix}/{file}` for a public key URL
    #[must_use]
    pub fn keyring(url: &str) -> CacheAddress {
        Self::translate(url, None)
    }
}
