use std::path::Path;

use rand::seq::SliceRandom;
use tracing::debug;

use crate::{Error, Result};

/// Picks one proxy at random from a newline-delimited proxy list.
///
/// The pick is made once; the session keeps using it.
pub fn load_proxy(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::ProxyFileMissing(path.to_path_buf()));
    }

    let contents = std::fs::read_to_string(path)?;
    let proxies = parse_proxy_list(&contents);
    let proxy = proxies
        .choose(&mut rand::thread_rng())
        .ok_or_else(|| Error::EmptyProxyList(path.to_path_buf()))?;

    debug!(proxy, total = proxies.len(), "selected proxy");
    Ok(proxy.to_string())
}

/// Like [`load_proxy`], but a missing path means no proxy at all.
pub fn load_optional_proxy(path: Option<&Path>) -> Result<Option<String>> {
    path.map(load_proxy).transpose()
}

fn parse_proxy_list(contents: &str) -> Vec<&str> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn skips_blank_lines() {
        let list = "\n  http://10.0.0.1:3128 \n\nsocks5://10.0.0.2:1080\r\n";
        assert_eq!(
            parse_proxy_list(list),
            vec!["http://10.0.0.1:3128", "socks5://10.0.0.2:1080"]
        );
    }

    #[test]
    fn picks_a_listed_proxy() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "http://10.0.0.1:3128").unwrap();
        writeln!(file, "http://10.0.0.2:3128").unwrap();

        let proxy = load_proxy(file.path()).unwrap();
        assert!(["http://10.0.0.1:3128", "http://10.0.0.2:3128"].contains(&proxy.as_str()));
    }

    #[test]
    fn missing_file_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_proxy(dir.path().join("proxy.txt")).unwrap_err();
        assert!(matches!(err, Error::ProxyFileMissing(_)));
        assert!(err.is_configuration());
    }

    #[test]
    fn empty_file_is_configuration_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = load_proxy(file.path()).unwrap_err();
        assert!(matches!(err, Error::EmptyProxyList(_)));
    }

    #[test]
    fn no_path_no_proxy() {
        assert_eq!(load_optional_proxy(None).unwrap(), None);
    }
}
