//! Filter coefficients used by DP
//!
//! The CIC stages are not stored: an order `N`, decimation `R` CIC filter is
//! the `N`-fold convolution of a length `R` boxcar, which is exactly what the
//! hardware tables contain.  The channel FIRs and the beamformer delay FIRs
//! are the hardware integer coefficients.

use crate::error::{DpError, Result};

/// taps per beamformer delay FIR
pub const DELAY_FIR_TAPS: usize = 32;

/// number of fractional delay phases, one per 1/16 of a sample
pub const DELAY_FIR_PHASES: usize = 16;

/// intrinsic delay of the default delay FIRs, phase 0 is a pure delay of this
/// many samples
pub const DELAY_FIR_GROUP_DELAY: usize = 13;

/// impulse response of a CIC filter of the given order and decimation
pub fn cic_coeff(order: usize, decimation: usize) -> Result<Vec<i64>> {
    if order == 0 || decimation == 0 {
        return Err(DpError::InvalidInput(format!(
            "CIC filter needs a positive order and decimation, got order={} decimation={}",
            order, decimation
        )));
    }
    Ok(cic_impulse(order, decimation))
}

pub(crate) fn cic_impulse(order: usize, decimation: usize) -> Vec<i64> {
    let boxcar = vec![1_i64; decimation];
    (0..order).fold(vec![1_i64], |acc, _| convolve(&acc, &boxcar))
}

fn convolve(a: &[i64], b: &[i64]) -> Vec<i64> {
    let mut result = vec![0_i64; a.len() + b.len() - 1];
    for (i, &x) in a.iter().enumerate() {
        for (j, &y) in b.iter().enumerate() {
            result[i + j] += x * y;
        }
    }
    result
}

/// TBN channel FIR, decimation by 20
pub const TBN_FIR: [f64; 160] = [
    -2737.0, 531.0, 516.0, 521.0, 543.0, 579.0, 625.0, 679.0, 738.0, 798.0,
    858.0, 915.0, 966.0, 1009.0, 1042.0, 1062.0, 1068.0, 1057.0, 1028.0, 980.0,
    911.0, 820.0, 711.0, 574.0, 421.0, 247.0, 51.0, -163.0, -392.0, -634.0,
    -886.0, -1145.0, -1408.0, -1671.0, -1930.0, -2179.0, -2414.0, -2629.0, -2820.0, -2982.0,
    -3110.0, -3199.0, -3244.0, -3241.0, -3186.0, -3073.0, -2903.0, -2671.0, -2374.0, -2013.0,
    -1585.0, -1092.0, -532.0, 90.0, 775.0, 1517.0, 2314.0, 3160.0, 4051.0, 4980.0,
    5941.0, 6927.0, 7929.0, 8940.0, 9952.0, 10955.0, 11943.0, 12904.0, 13831.0, 14715.0,
    15549.0, 16323.0, 17032.0, 17668.0, 18225.0, 18698.0, 19082.0, 19373.0, 19569.0, 19667.0,
    19667.0, 19569.0, 19373.0, 19082.0, 18698.0, 18225.0, 17668.0, 17032.0, 16323.0, 15549.0,
    14715.0, 13831.0, 12904.0, 11943.0, 10955.0, 9952.0, 8940.0, 7929.0, 6927.0, 5941.0,
    4980.0, 4051.0, 3160.0, 2314.0, 1517.0, 775.0, 90.0, -532.0, -1092.0, -1585.0,
    -2013.0, -2374.0, -2671.0, -2903.0, -3073.0, -3186.0, -3241.0, -3244.0, -3199.0, -3110.0,
    -2982.0, -2820.0, -2629.0, -2414.0, -2179.0, -1930.0, -1671.0, -1408.0, -1145.0, -886.0,
    -634.0, -392.0, -163.0, 51.0, 247.0, 421.0, 574.0, 711.0, 820.0, 911.0,
    980.0, 1028.0, 1057.0, 1068.0, 1062.0, 1042.0, 1009.0, 966.0, 915.0, 858.0,
    798.0, 738.0, 679.0, 625.0, 579.0, 543.0, 521.0, 516.0, 531.0, -2737.0,
];

/// DRX channel FIR, decimation by 2
pub const DRX_FIR: [f64; 59] = [
    -62.0, 66.0, 145.0, 34.0, -144.0, -59.0, 199.0, 145.0, -227.0, -257.0,
    232.0, 405.0, -194.0, -583.0, 92.0, 782.0, 94.0, -990.0, -397.0, 1186.0,
    859.0, -1340.0, -1565.0, 1396.0, 2718.0, -1187.0, -4960.0, -189.0, 11431.0, 17747.0,
    11431.0, -189.0, -4960.0, -1187.0, 2718.0, 1396.0, -1565.0, -1340.0, 859.0, 1186.0,
    -397.0, -990.0, 94.0, 782.0, 92.0, -583.0, -194.0, 405.0, 232.0, -257.0,
    -227.0, 145.0, 199.0, -59.0, -144.0, 34.0, 145.0, 66.0, -62.0,
];

/// default beamformer delay FIRs, one per 1/16 sample phase
pub const DELAY_FIRS: [[i32; DELAY_FIR_TAPS]; DELAY_FIR_PHASES] = [
    [
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 32767, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    ],
    [
        -15, 16, -41, 45, -89, 99, -168, 196, -308, 385, -605, 904, -1896, 32515, 2148, -1051,
        630, -477, 316, -267, 171, -152, 90, -82, 42, -39, 15, -15, 0, 0, 0, 0,
    ],
    [
        -30, 32, -81, 88, -173, 193, -327, 381, -597, 744, -1163, 1719, -3513, 31851, 4515, -2128,
        1263, -949, 627, -528, 339, -301, 177, -162, 83, -77, 30, -29, 0, 0, 0, 0,
    ],
    [
        -43, 46, -117, 127, -249, 278, -472, 547, -857, 1063, -1656, 2422, -4833, 30791, 7060, -3191,
        1875, -1398, 922, -773, 496, -439, 259, -237, 120, -113, 44, -42, 0, 0, 0, 0,
    ],
    [
        -55, 58, -148, 161, -315, 351, -595, 689, -1079, 1332, -2069, 2995, -5845, 29362, 9737, -4202,
        2441, -1806, 1189, -993, 637, -563, 331, -303, 154, -144, 56, -53, 0, 0, 0, 0,
    ],
    [
        -64, 68, -174, 188, -369, 410, -695, 801, -1254, 1543, -2388, 3424, -6549, 27594, 12494, -5118,
        2937, -2157, 1416, -1179, 756, -666, 392, -357, 182, -170, 66, -63, 0, 0, 0, 0,
    ],
    [
        -71, 75, -192, 208, -407, 452, -766, 881, -1379, 1689, -2606, 3701, -6950, 25528, 15277, -5900,
        3342, -2436, 1595, -1323, 848, -745, 439, -399, 203, -189, 74, -70, 0, 0, 0, 0,
    ],
    [
        -75, 79, -203, 220, -430, 476, -808, 926, -1448, 1766, -2719, 3826, -7062, 23211, 18030, -6508,
        3636, -2628, 1717, -1419, 908, -796, 469, -426, 217, -202, 79, -75, 0, 0, 0, 0,
    ],
    [
        -76, 81, -206, 223, -436, 482, -818, 935, -1461, 1775, -2725, 3801, -6906, 20693, 20693, -6906,
        3801, -2725, 1775, -1461, 935, -818, 482, -436, 223, -206, 81, -76, 0, 0, 0, 0,
    ],
    [
        -75, 79, -202, 217, -426, 469, -796, 908, -1419, 1717, -2628, 3636, -6508, 18030, 23211, -7062,
        3826, -2719, 1766, -1448, 926, -808, 476, -430, 220, -203, 79, -75, 0, 0, 0, 0,
    ],
    [
        -70, 74, -189, 203, -399, 439, -745, 848, -1323, 1595, -2436, 3342, -5900, 15277, 25528, -6950,
        3701, -2606, 1689, -1379, 881, -766, 452, -407, 208, -192, 75, -71, 0, 0, 0, 0,
    ],
    [
        -63, 66, -170, 182, -357, 392, -666, 756, -1179, 1416, -2157, 2937, -5118, 12494, 27594, -6549,
        3424, -2388, 1543, -1254, 801, -695, 410, -369, 188, -174, 68, -64, 0, 0, 0, 0,
    ],
    [
        -53, 56, -144, 154, -303, 331, -563, 637, -993, 1189, -1806, 2441, -4202, 9737, 29362, -5845,
        2995, -2069, 1332, -1079, 689, -595, 351, -315, 161, -148, 58, -55, 0, 0, 0, 0,
    ],
    [
        -42, 44, -113, 120, -237, 259, -439, 496, -773, 922, -1398, 1875, -3191, 7060, 30791, -4833,
        2422, -1656, 1063, -857, 547, -472, 278, -249, 127, -117, 46, -43, 0, 0, 0, 0,
    ],
    [
        -29, 30, -77, 83, -162, 177, -301, 339, -528, 627, -949, 1263, -2128, 4515, 31851, -3513,
        1719, -1163, 744, -597, 381, -327, 193, -173, 88, -81, 32, -30, 0, 0, 0, 0,
    ],
    [
        -15, 15, -39, 42, -82, 90, -152, 171, -267, 316, -477, 630, -1051, 2148, 32515, -1896,
        904, -605, 385, -308, 196, -168, 99, -89, 45, -41, 16, -15, 0, 0, 0, 0,
    ],
];
