use crate::core::Candle;

/// Daily BTC/USDT candles shown when the live source is unavailable.
///
/// Thirty consecutive days starting 2024-01-01 00:00 UTC, already in
/// canonical order.
pub const FALLBACK_CANDLES: [Candle; 30] = [
    Candle::new(1704067200, 42280.00, 42479.36, 41286.29, 41860.48),
    Candle::new(1704153600, 41860.48, 42347.98, 40442.56, 40792.66),
    Candle::new(1704240000, 40792.66, 41246.84, 39609.33, 39715.57),
    Candle::new(1704326400, 39715.57, 39844.94, 39448.07, 39591.90),
    Candle::new(1704412800, 39591.90, 40260.34, 39279.41, 39446.21),
    Candle::new(1704499200, 39446.21, 39970.60, 38069.14, 38808.79),
    Candle::new(1704585600, 38808.79, 39389.89, 38049.20, 39033.12),
    Candle::new(1704672000, 39033.12, 39714.34, 37700.95, 37974.86),
    Candle::new(1704758400, 37974.86, 38131.33, 36894.48, 37175.25),
    Candle::new(1704844800, 37175.25, 38140.36, 36711.72, 37941.05),
    Candle::new(1704931200, 37941.05, 38639.14, 37491.09, 38305.76),
    Candle::new(1705017600, 38305.76, 38423.47, 37092.80, 37305.71),
    Candle::new(1705104000, 37305.71, 38126.42, 37020.15, 37760.27),
    Candle::new(1705190400, 37760.27, 38384.30, 37481.00, 37998.34),
    Candle::new(1705276800, 37998.34, 39294.63, 37755.39, 38729.87),
    Candle::new(1705363200, 38729.87, 39393.39, 38042.32, 38947.31),
    Candle::new(1705449600, 38947.31, 39824.32, 38182.26, 39540.31),
    Candle::new(1705536000, 39540.31, 39916.98, 38039.60, 38643.54),
    Candle::new(1705622400, 38643.54, 39060.94, 37745.96, 37848.37),
    Candle::new(1705708800, 37848.37, 38884.34, 37382.29, 38280.95),
    Candle::new(1705795200, 38280.95, 39510.26, 37725.29, 39210.40),
    Candle::new(1705881600, 39210.40, 39970.07, 38810.00, 39479.03),
    Candle::new(1705968000, 39479.03, 41117.48, 39063.17, 40350.65),
    Candle::new(1706054400, 40350.65, 40927.83, 39760.45, 40801.67),
    Candle::new(1706140800, 40801.67, 42033.83, 40116.42, 41214.66),
    Candle::new(1706227200, 41214.66, 41583.29, 40134.12, 40705.45),
    Candle::new(1706313600, 40705.45, 41125.14, 39342.54, 39541.23),
    Candle::new(1706400000, 39541.23, 39662.27, 38030.43, 38642.06),
    Candle::new(1706486400, 38642.06, 38891.57, 37451.13, 37792.67),
    Candle::new(1706572800, 37792.67, 38834.30, 37411.52, 38700.76),
];

#[must_use]
pub fn fallback_candles() -> Vec<Candle> {
    FALLBACK_CANDLES.to_vec()
}
