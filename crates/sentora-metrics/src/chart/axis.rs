use super::ChartDataPoint;

/// Smallest ceiling the chart will ever show, in millions
const AXIS_FLOOR: i64 = 40;
/// Headroom above the tallest point before rounding
const AXIS_BUFFER: f64 = 1.15;

/// Y-axis ceiling for a series of chart points: the tallest value plus
/// 15% headroom, rounded up to the next multiple of 5 and never below 40.
/// Gap points (`value: None`) count as zero.
pub fn y_axis_max(data: &[ChartDataPoint]) -> i64 {
    if data.is_empty() {
        return AXIS_FLOOR;
    }

    let max_value = data
        .iter()
        .map(|point| point.value.unwrap_or(0))
        .max()
        .unwrap_or(0);

    let buffered = max_value as f64 * AXIS_BUFFER;
    let rounded = (buffered / 5.0).ceil() as i64 * 5;

    rounded.max(AXIS_FLOOR)
}
