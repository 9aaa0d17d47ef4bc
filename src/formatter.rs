//! Formatter Module
//!
//! セル値を表示文字列に変換し、使用するフォント（欧文 / 東アジア）を決定するモジュール。

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};

use crate::api::DateFormat;
use crate::types::CellValue;

/// 数値を整数表記で出力する上限（これを超えると浮動小数点表記）
const INTEGER_DISPLAY_LIMIT: f64 = 1e15;

/// 固定小数点表記を使う10進指数の範囲（範囲外は`1e-05`、`1e+20`のような指数表記）
const FIXED_NOTATION_EXPONENTS: std::ops::Range<i32> = -4..16;

/// ランに適用するフォントの種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontScript {
    /// 欧文フォント（ASCIIのみの文字列）
    Western,

    /// 東アジアフォント（非ASCII文字列、および文字列以外の値）
    EastAsian,
}

/// フォーマット済みセル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellText {
    /// 表示文字列
    pub text: String,

    /// フォント種別
    pub script: FontScript,
}

/// セルフォーマッター
///
/// セル値のフォーマット処理のファサードとして機能します。
#[derive(Debug)]
pub(crate) struct CellFormatter {
    /// 日付フォーマッター
    date_formatter: DateFormatter,

    /// 数値フォーマッター
    number_formatter: NumberFormatter,
}

impl CellFormatter {
    /// 新しいCellFormatterインスタンスを生成
    pub fn new(date_format: DateFormat) -> Self {
        Self {
            date_formatter: DateFormatter { date_format },
            number_formatter: NumberFormatter,
        }
    }

    /// セル値を表示文字列とフォント種別に変換
    ///
    /// 値の種類に関わらず失敗しません。ASCII文字のみで構成される文字列（エラー値を含む）だけが
    /// 欧文フォントになり、それ以外（空セルを含む）はすべて東アジアフォントです。
    pub fn format_cell(&self, value: &CellValue) -> CellText {
        let (text, script) = match value {
            CellValue::Text(s) | CellValue::Error(s) => (s.clone(), text_script(s)),
            CellValue::Number(n) => (self.number_formatter.format(*n), FontScript::EastAsian),
            CellValue::Bool(b) => (
                if *b { "True" } else { "False" }.to_string(),
                FontScript::EastAsian,
            ),
            CellValue::DateTime(dt) => (self.date_formatter.format(dt), FontScript::EastAsian),
            CellValue::Time(t) => (format_time(t), FontScript::EastAsian),
            CellValue::Duration(d) => (format_duration(d), FontScript::EastAsian),
            CellValue::Empty => (String::new(), FontScript::EastAsian),
        };

        CellText { text, script }
    }
}

/// 文字列のフォント種別（ASCIIのみなら欧文）
fn text_script(text: &str) -> FontScript {
    if text.is_ascii() {
        FontScript::Western
    } else {
        FontScript::EastAsian
    }
}

/// 日付フォーマッター
#[derive(Debug)]
pub(crate) struct DateFormatter {
    date_format: DateFormat,
}

impl DateFormatter {
    /// 日付時刻を`DateFormat`に従ってフォーマット
    pub fn format(&self, value: &NaiveDateTime) -> String {
        value.format(self.date_format.pattern()).to_string()
    }
}

/// 数値フォーマッター
///
/// 小数部のない数値は整数として、それ以外は最短の往復可能な桁で出力します。
/// 10進指数が-4未満または16以上の場合は指数表記（`1e-05`、`1.5e+20`）になります。
#[derive(Debug)]
pub(crate) struct NumberFormatter;

impl NumberFormatter {
    pub fn format(&self, value: f64) -> String {
        if value.is_nan() {
            return "nan".to_string();
        }
        if value.is_infinite() {
            return if value > 0.0 { "inf" } else { "-inf" }.to_string();
        }
        if value.fract() == 0.0 && value.abs() < INTEGER_DISPLAY_LIMIT {
            return format!("{}", value as i64);
        }

        let scientific = format!("{:e}", value);
        let (mantissa, exponent) = scientific
            .split_once('e')
            .unwrap_or((scientific.as_str(), "0"));
        let exponent: i32 = exponent.parse().unwrap_or(0);

        if FIXED_NOTATION_EXPONENTS.contains(&exponent) {
            let fixed = value.to_string();
            if fixed.contains('.') {
                fixed
            } else {
                format!("{}.0", fixed)
            }
        } else {
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exponent.unsigned_abs())
        }
    }
}

/// 時刻を`HH:MM:SS`（マイクロ秒がある場合は`HH:MM:SS.ffffff`）形式に変換
fn format_time(value: &NaiveTime) -> String {
    let micros = (value.nanosecond() % 1_000_000_000) / 1_000;
    if micros == 0 {
        value.format("%H:%M:%S").to_string()
    } else {
        format!("{}.{:06}", value.format("%H:%M:%S"), micros)
    }
}

/// 経過時間を`H:MM:SS`（1日以上は`N day(s), H:MM:SS`）形式に変換
fn format_duration(value: &TimeDelta) -> String {
    let total = value.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.unsigned_abs();

    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    match days {
        0 => format!("{}{}:{:02}:{:02}", sign, hours, minutes, seconds),
        1 => format!("{}1 day, {}:{:02}:{:02}", sign, hours, minutes, seconds),
        n => format!("{}{} days, {}:{:02}:{:02}", sign, n, hours, minutes, seconds),
    }
}

/// ISO 8601形式の日付・日時文字列を解析（calamineの`DateTimeIso`用）
pub(crate) fn parse_iso_datetime(value: &str) -> Option<NaiveDateTime> {
    value
        .parse::<NaiveDateTime>()
        .ok()
        .or_else(|| {
            value
                .parse::<NaiveDate>()
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
