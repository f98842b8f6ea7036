//! Record loading: fetch the source table and parse it into order lines

mod sales_csv;

pub use sales_csv::{parse_number, parse_timestamp, SalesCsvParser, REQUIRED_COLUMNS};

use crate::types::{OrderLine, Result, SalesvizError};
use std::fmt;
use std::path::PathBuf;
use tracing::info;

/// Trait for turning raw table bytes into typed order lines
pub trait TableParser: Send + Sync {
    /// Parser name (e.g., "sales-csv")
    fn name(&self) -> &str;

    /// Parse a whole table
    fn parse_bytes(&self, bytes: &[u8]) -> Result<Vec<OrderLine>>;
}

/// Where the source table lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl DataSource {
    /// `http://` and `https://` locations are fetched remotely, anything
    /// else is a local path.
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Fetches a [`DataSource`] and parses it with a [`TableParser`]
pub struct RecordLoader {
    parser: Box<dyn TableParser>,
}

impl RecordLoader {
    /// Loader for the comma-separated sales export
    pub fn new() -> Self {
        Self {
            parser: Box::new(SalesCsvParser::new()),
        }
    }

    pub fn with_parser(parser: Box<dyn TableParser>) -> Self {
        Self { parser }
    }

    pub fn parser_name(&self) -> &str {
        self.parser.name()
    }

    /// Read the raw bytes of a source. Any failure is a load error.
    pub async fn fetch(source: &DataSource) -> Result<Vec<u8>> {
        match source {
            DataSource::File(path) => tokio::fs::read(path).await.map_err(|e| {
                SalesvizError::Load(format!("cannot read {}: {}", path.display(), e))
            }),
            DataSource::Url(url) => {
                let response = reqwest::get(url.as_str())
                    .await
                    .map_err(|e| SalesvizError::Load(format!("cannot fetch {}: {}", url, e)))?;
                let response = response
                    .error_for_status()
                    .map_err(|e| SalesvizError::Load(format!("cannot fetch {}: {}", url, e)))?;
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| SalesvizError::Load(format!("cannot read body of {}: {}", url, e)))?;
                Ok(bytes.to_vec())
            }
        }
    }

    /// Fetch and parse. This is the only await point of a report run.
    pub async fn load(&self, source: &DataSource) -> Result<Vec<OrderLine>> {
        let bytes = Self::fetch(source).await?;
        let lines = self.parser.parse_bytes(&bytes)?;
        info!(source = %source, rows = lines.len(), parser = self.parser.name(), "loaded");
        Ok(lines)
    }
}

impl Default for RecordLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(name)
    }

    #[test]
    fn test_data_source_parse_file() {
        assert_eq!(
            DataSource::parse("data/data.csv"),
            DataSource::File(PathBuf::from("data/data.csv"))
        );
    }

    #[test]
    fn test_data_source_parse_url() {
        assert_eq!(
            DataSource::parse(" https://example.com/data.csv "),
            DataSource::Url("https://example.com/data.csv".into())
        );
        assert!(matches!(
            DataSource::parse("http://localhost/x.csv"),
            DataSource::Url(_)
        ));
    }

    #[test]
    fn test_data_source_display() {
        let src = DataSource::File(PathBuf::from("data/data.csv"));
        assert_eq!(src.to_string(), "data/data.csv");
    }

    #[tokio::test]
    async fn test_load_fixture() {
        let loader = RecordLoader::new();
        let lines = loader
            .load(&DataSource::File(fixture("sales-sample.csv")))
            .await
            .unwrap();

        assert_eq!(lines.len(), 14);
        assert_eq!(lines[0].order_code, "DH0001");
        // One row carries a broken timestamp but is still loaded
        assert_eq!(lines.iter().filter(|l| l.created_at.is_none()).count(), 1);
    }

    #[tokio::test]
    async fn test_load_missing_file_is_load_error() {
        let loader = RecordLoader::new();
        let err = loader
            .load(&DataSource::File(fixture("does-not-exist.csv")))
            .await
            .unwrap_err();

        assert!(matches!(err, SalesvizError::Load(_)));
    }

    #[tokio::test]
    async fn test_load_malformed_header_is_load_error() {
        let loader = RecordLoader::new();
        let err = loader
            .load(&DataSource::File(fixture("malformed.csv")))
            .await
            .unwrap_err();

        assert!(err.is_load_failure());
    }

    #[tokio::test]
    async fn test_load_temp_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "Mã đơn hàng,Thời gian tạo đơn,Mã khách hàng,Mã mặt hàng,Tên mặt hàng,Mã nhóm hàng,Tên nhóm hàng,SL,Thành tiền"
        )
        .unwrap();
        writeln!(file, "DH1,2023-03-01 08:00:00,KH1,A,A,G,G,1,5000").unwrap();

        let lines = RecordLoader::new()
            .load(&DataSource::File(file.path().to_path_buf()))
            .await
            .unwrap();
        assert_eq!(lines.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_truncated_body_is_load_error() {
        use std::io::Read;
        use std::net::TcpListener;

        // Promise 100 bytes, send 5, then hang up
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = [0u8; 1024];
            let _ = stream.read(&mut request);
            stream
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\nMa,SL")
                .unwrap();
        });

        let source = DataSource::Url(format!("http://{}/sales.csv", addr));
        let err = RecordLoader::fetch(&source).await.unwrap_err();
        server.join().unwrap();

        assert!(matches!(err, SalesvizError::Load(_)));
    }

    #[test]
    fn test_loader_parser_name() {
        assert_eq!(RecordLoader::new().parser_name(), "sales-csv");
    }
}
