//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// xlsx2docxクレート全体で使用するエラー型
///
/// Excelファイルの読み込み、Word文書の構築・保存処理中に発生する
/// すべてのエラーを統一的に扱うために使用されます。
///
/// # エラーの種類
///
/// - `Io`: I/O操作中に発生したエラー（読み込み失敗、書き込み権限なしなど）
/// - `Parse`: Excelファイルの解析中に発生したエラー（calamine由来）
/// - `Xml`: document.xmlの書き出し中に発生したエラー（quick-xml由来）
/// - `Zip`: .docxパッケージ（ZIPアーカイブ）の書き出しエラー
/// - `Config`: 設定の検証に失敗したエラー
/// - `SecurityViolation`: セキュリティ制限に違反したエラー
///
/// # 使用例
///
/// ```rust,no_run
/// use xlsx2docx::XlsxToDocxError;
/// use std::fs::File;
///
/// fn open_excel_file(path: &str) -> Result<(), XlsxToDocxError> {
///     let file = File::open(path)?;  // Ioエラーが自動的に変換される
///     // ... 処理 ...
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum XlsxToDocxError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Excelファイルの解析中に発生したエラー
    ///
    /// ファイル形式が不正、破損したファイルなどが原因となります。
    #[error("Failed to parse Excel file: {0}")]
    Parse(#[from] calamine::Error),

    /// XMLの書き出しエラー
    #[error("XML write error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// ZIPアーカイブの書き出しエラー
    ///
    /// .docxファイル（ZIPアーカイブ）の生成中に発生したエラーです。
    #[error("ZIP archive error: {0}")]
    Zip(String),

    /// 設定の検証に失敗したエラー
    ///
    /// `ConverterBuilder::build()`時に設定を検証し、無効な設定が検出された
    /// 場合に発生します。存在しないシートの選択もこのエラーになります。
    ///
    /// # 例
    ///
    /// ```rust,no_run
    /// use xlsx2docx::{ConverterBuilder, TableStyle, XlsxToDocxError};
    ///
    /// let style = TableStyle {
    ///     font_size_half_points: 0,
    ///     ..TableStyle::default()
    /// };
    /// let result = ConverterBuilder::new().with_table_style(style).build();
    ///
    /// match result {
    ///     Err(XlsxToDocxError::Config(msg)) => {
    ///         println!("設定エラー: {}", msg);
    ///     }
    ///     _ => {}
    /// }
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// セキュリティ制限に違反したエラー
    ///
    /// 入力ファイルサイズの上限超過、出力ファイル名によるディレクトリ脱出などで
    /// 発生します。
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}

impl From<zip::result::ZipError> for XlsxToDocxError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(io_err) => XlsxToDocxError::Io(io_err),
            other => XlsxToDocxError::Zip(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: XlsxToDocxError = io_err.into();

        match error {
            XlsxToDocxError::Io(e) => {
                assert_eq!(e.kind(), io::ErrorKind::NotFound);
                assert_eq!(e.to_string(), "File not found");
            }
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_io_error_display() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied");
        let error: XlsxToDocxError = io_err.into();

        let error_msg = error.to_string();
        assert!(error_msg.contains("IO error"));
        assert!(error_msg.contains("Permission denied"));
    }

    #[test]
    fn test_parse_error_display() {
        let parse_err = calamine::Error::Msg("Corrupted file");
        let error: XlsxToDocxError = parse_err.into();

        let error_msg = error.to_string();
        assert!(error_msg.contains("Failed to parse Excel file"));
        assert!(error_msg.contains("Corrupted file"));
    }

    #[test]
    fn test_zip_error_conversion() {
        let error: XlsxToDocxError = zip::result::ZipError::FileNotFound.into();
        assert!(matches!(error, XlsxToDocxError::Zip(_)));

        // ZIP層のI/OエラーはIoとして扱う
        let io_err = io::Error::new(io::ErrorKind::WriteZero, "disk full");
        let error: XlsxToDocxError = zip::result::ZipError::Io(io_err).into();
        match error {
            XlsxToDocxError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::WriteZero),
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_error_conversion_with_question_mark() {
        fn io_operation() -> Result<(), XlsxToDocxError> {
            let _file = std::fs::File::open("nonexistent_file.xlsx")?;
            Ok(())
        }

        match io_operation() {
            Err(XlsxToDocxError::Io(_)) => {}
            _ => panic!("Expected Io error from ? operator"),
        }
    }

    #[test]
    fn test_all_error_formats() {
        let io_err: XlsxToDocxError = io::Error::other("test io").into();
        assert!(io_err.to_string().starts_with("IO error"));

        let parse_err: XlsxToDocxError = calamine::Error::Msg("test parse").into();
        assert!(parse_err
            .to_string()
            .starts_with("Failed to parse Excel file"));

        let zip_err = XlsxToDocxError::Zip("test zip".to_string());
        assert!(zip_err.to_string().starts_with("ZIP archive error"));

        let config_err = XlsxToDocxError::Config("test config".to_string());
        assert!(config_err.to_string().starts_with("Configuration error"));

        let security_err = XlsxToDocxError::SecurityViolation("test".to_string());
        assert!(security_err.to_string().starts_with("Security violation"));
    }
}
