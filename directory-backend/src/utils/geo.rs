// src/utils/geo.rs

//! 球面近似による距離計算

/// 地球半径 (km)
pub const EARTH_RADIUS_KM: f64 = 6371.0;

// 事前絞り込みの境界で取りこぼさないための余白（度）
const WINDOW_MARGIN_DEG: f64 = 1e-9;

/// 2点間の大円距離 (km)
///
/// `d = R * acos(cos(lat1)·cos(lat2)·cos(lon2−lon1) + sin(lat1)·sin(lat2))`
/// acos の引数は丸め誤差で [-1, 1] をはみ出すことがあるためクランプする。
pub fn great_circle_distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    // 同一地点は丸め誤差で 0 にならないことがある
    if lat1 == lat2 && lon1 == lon2 {
        return 0.0;
    }

    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let cos_angle = phi1.cos() * phi2.cos() * delta_lambda.cos() + phi1.sin() * phi2.sin();

    EARTH_RADIUS_KM * cos_angle.clamp(-1.0, 1.0).acos()
}

/// 半径 `radius_km` の円を必ず含む緯度の範囲 (min, max)
///
/// 大円距離は緯度差の弧長以上なので、この範囲外の地点は円に入らない。
pub fn latitude_window(latitude: f64, radius_km: f64) -> (f64, f64) {
    let delta = (radius_km / EARTH_RADIUS_KM).to_degrees() + WINDOW_MARGIN_DEG;
    ((latitude - delta).max(-90.0), (latitude + delta).min(90.0))
}

pub fn is_within_radius(
    center_lat: f64,
    center_lon: f64,
    radius_km: f64,
    lat: f64,
    lon: f64,
) -> bool {
    great_circle_distance_km(center_lat, center_lon, lat, lon) <= radius_km
}
