//! 시나리오 입력 레코드.
//!
//! HTTP/CLI 계층에서 넘어오는 평면 키-값 맵을 그대로 받고, 필드 정의(`FieldSpec`)에 따라
//! 기본값 적용, 숫자 파싱, 범위 검증을 수행한다. 검증 실패는 계산 전에 즉시 반환된다.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::scenario::CalcError;

/// 숫자 필드의 허용 하한.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// > 0
    Positive,
    /// >= 0 (주차층 수, 정수두 등)
    NonNegative,
}

/// 필드 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Number(Bound),
    /// 열거형 문자열. 허용 값은 시나리오 기준표의 키이다.
    Choice,
}

/// 입력 필드 정의.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub key: &'static str,
    pub kind: FieldKind,
    /// 값이 없을 때 적용하는 기본값. None이면 필수 입력.
    pub default: Option<&'static str>,
    /// 표시용 단위/힌트 (예: "m²", "mm")
    pub unit: &'static str,
}

impl FieldSpec {
    pub const fn number(key: &'static str, default: Option<&'static str>, unit: &'static str) -> Self {
        Self {
            key,
            kind: FieldKind::Number(Bound::Positive),
            default,
            unit,
        }
    }

    pub const fn non_negative(
        key: &'static str,
        default: Option<&'static str>,
        unit: &'static str,
    ) -> Self {
        Self {
            key,
            kind: FieldKind::Number(Bound::NonNegative),
            default,
            unit,
        }
    }

    pub const fn choice(key: &'static str, default: &'static str) -> Self {
        Self {
            key,
            kind: FieldKind::Choice,
            default: Some(default),
            unit: "",
        }
    }
}

/// 평면 입력 레코드. 모든 값은 원문 문자열로 보관한다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioInput {
    values: BTreeMap<String, String>,
}

impl ScenarioInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// 빌더 형태로 값을 추가한다.
    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl ToString) {
        self.values.insert(key.to_string(), value.to_string());
    }

    /// 다른 레코드의 값으로 덮어쓴다.
    pub fn merge(&mut self, other: ScenarioInput) {
        self.values.extend(other.values);
    }

    /// 값이 없거나 공백이면 None.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// `key=value` 형태 문자열 목록으로부터 레코드를 만든다.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, CalcError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut input = Self::new();
        for pair in pairs {
            let (key, value) = pair.split_once('=').ok_or_else(|| CalcError::InvalidInput {
                field: pair.trim().to_string(),
                reason: "key=value 형식이어야 합니다".into(),
            })?;
            input.set(key.trim(), value.trim());
        }
        Ok(input)
    }

    /// JSON 객체로부터 레코드를 만든다. 숫자/문자열/불리언만 허용한다.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, CalcError> {
        let obj = value.as_object().ok_or_else(|| CalcError::InvalidInput {
            field: "<body>".into(),
            reason: "JSON 객체여야 합니다".into(),
        })?;
        let mut input = Self::new();
        for (key, v) in obj {
            match v {
                serde_json::Value::Null => {}
                serde_json::Value::String(s) => input.set(key, s),
                serde_json::Value::Number(n) => input.set(key, n),
                serde_json::Value::Bool(b) => input.set(key, b),
                _ => {
                    return Err(CalcError::InvalidInput {
                        field: key.clone(),
                        reason: "단일 값이어야 합니다".into(),
                    })
                }
            }
        }
        Ok(input)
    }

    /// 숫자 필드를 읽고 검증한다.
    pub fn number(&self, spec: &FieldSpec) -> Result<f64, CalcError> {
        let bound = match spec.kind {
            FieldKind::Number(bound) => bound,
            FieldKind::Choice => Bound::Positive,
        };
        let text = self
            .raw(spec.key)
            .or(spec.default)
            .ok_or_else(|| invalid(spec.key, "필수 입력입니다"))?;
        let value = parse_number(text).ok_or_else(|| invalid(spec.key, "숫자가 아닙니다"))?;
        if !value.is_finite() {
            return Err(invalid(spec.key, "유한한 숫자여야 합니다"));
        }
        match bound {
            Bound::Positive if value <= 0.0 => Err(invalid(spec.key, "0보다 커야 합니다")),
            Bound::NonNegative if value < 0.0 => Err(invalid(spec.key, "0 이상이어야 합니다")),
            _ => Ok(value),
        }
    }

    /// 열거형 필드를 정규화된 키로 읽는다 (소문자, 공백/하이픈 -> 밑줄).
    pub fn choice(&self, spec: &FieldSpec) -> String {
        let text = self.raw(spec.key).or(spec.default).unwrap_or_default();
        normalize_choice(text)
    }
}

fn invalid(field: &str, reason: &str) -> CalcError {
    CalcError::InvalidInput {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

pub fn normalize_choice(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// 숫자 문자열을 파싱한다.
/// 페르시아/아랍-인도 숫자와 소수점 기호를 ASCII로 바꾸고, 가장 긴 숫자 접두부만 읽는다.
/// "1.5 bar", "1.5bar", "1.5بار" 모두 1.5 이다.
pub fn parse_number(text: &str) -> Option<f64> {
    let prefix: String = text
        .trim()
        .chars()
        .map(normalize_digit)
        .take_while(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E'))
        .collect();
    // 접두부는 ASCII이므로 바이트 경계로 잘라도 된다
    (1..=prefix.len())
        .rev()
        .find_map(|end| prefix[..end].parse::<f64>().ok())
}

fn normalize_digit(c: char) -> char {
    match c {
        '\u{06F0}'..='\u{06F9}' => char::from(b'0' + (c as u32 - 0x06F0) as u8),
        '\u{0660}'..='\u{0669}' => char::from(b'0' + (c as u32 - 0x0660) as u8),
        '\u{066B}' => '.',
        _ => c,
    }
}
