//! Security Module
//!
//! セキュリティ対策を実装するモジュール。
//! 入力ファイルサイズの上限と、出力ファイル名によるディレクトリ脱出への対策を提供します。

/// セキュリティ設定
///
/// ファイル処理時のセキュリティ制限を定義します。
#[derive(Debug, Clone)]
pub(crate) struct SecurityConfig {
    /// 入力ファイルの最大サイズ（バイト）
    /// デフォルト: 2GB (2_147_483_648 bytes)
    pub max_input_file_size: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_input_file_size: 2_147_483_648, // 2GB
        }
    }
}

/// 出力ファイル名の検証
///
/// 出力ファイル名はシート名から生成されるため、細工されたシート名で
/// 出力ディレクトリの外に書き込まれないよう検証します。
///
/// # 引数
///
/// * `name` - 検証するファイル名（ディレクトリを含まない1要素）
///
/// # 戻り値
///
/// * `Ok(())` - ファイル名が安全な場合
/// * `Err(String)` - ファイル名が危険な場合（区切り文字、NUL、`.`/`..`を含む）
pub(crate) fn validate_output_file_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Empty file name is not allowed".to_string());
    }

    if name == "." || name == ".." {
        return Err(format!("Path traversal detected: {}", name));
    }

    if name.contains('/') || name.contains('\\') {
        return Err(format!("Path separator in file name is not allowed: {}", name));
    }

    if name.contains('\0') {
        return Err("NUL character in file name is not allowed".to_string());
    }

    Ok(())
}
