use std::collections::BTreeMap;

/// 조회 테이블에서 계수를 찾는다. 키가 없으면 `fallback`을 반환한다.
pub fn lookup_factor(table: &BTreeMap<String, f64>, key: &str, fallback: f64) -> f64 {
    table.get(key).copied().unwrap_or(fallback)
}

/// 곱셈형 유량 모델.
///
/// Q = 기준값 × 면적(ha) × 작물계수 × 시간계수 × 시스템 보정 × 패턴계수
///
/// 곱셈이므로 인자 순서는 결과에 영향이 없다. 모든 계수는 0보다 커야 하며
/// 이는 설정 로드 단계에서 검증된다.
pub fn multiplicative_flow(factors: &[f64]) -> f64 {
    factors.iter().product()
}
