use std::collections::BTreeMap;

/// 열거형 카테고리별 고정 수두 오프셋을 누적한다.
/// 테이블에 없는 카테고리는 0 m 로 취급한다.
pub fn offset_static_head<'a, I>(selections: I) -> f64
where
    I: IntoIterator<Item = (&'a BTreeMap<String, f64>, &'a str)>,
{
    selections
        .into_iter()
        .map(|(table, key)| table.get(key).copied().unwrap_or(0.0))
        .sum()
}

/// 건물 정수두 = (지상층 + 주차층) × 층고
pub fn building_static_head(floors: f64, parking_floors: f64, floor_height_m: f64) -> f64 {
    (floors + parking_floors) * floor_height_m
}
