//! Raw register value to physical unit conversions
//!
//! All conversions are fixed linear scalars taken from the datasheet. Raw
//! values are passed through as-is; nothing here checks physical plausibility.

/// Volts per LSB of the V_RECT and V_OUT status registers (46 mV)
pub const VOLT_SCALAR: f32 = 0.046;

/// Watts per LSB of the received power register and the FOD offset (39 mW)
pub const WATT_SCALAR: f32 = 0.039;

/// VO_REG target for code 0, in millivolts
pub const VO_REG_BASE_MV: u16 = 450;

/// VO_REG target increment per code, in millivolts
pub const VO_REG_STEP_MV: u16 = 50;

/// Highest VO_REG code (3-bit field)
pub const VO_REG_MAX_CODE: u8 = 7;

/// Current limit percentages indexed by the 3-bit I_ILIM code
///
/// Codes 6 and 7 break the otherwise linear 10 % steps.
pub const ILIM_PERCENT: [u8; 8] = [10, 20, 30, 40, 50, 60, 90, 100];

/// Convert a V_RECT / V_OUT status byte to volts
pub fn raw_to_volts(raw: u8) -> f32 {
    f32::from(raw) * VOLT_SCALAR
}

/// Convert a received power (or FOD offset) code to watts
pub fn raw_to_watts(raw: u8) -> f32 {
    f32::from(raw) * WATT_SCALAR
}

/// VO_REG target in millivolts for a 3-bit code: `450 + code * 50`
///
/// Bits above the field are ignored.
pub const fn vo_reg_millivolts(code: u8) -> u16 {
    VO_REG_BASE_MV + (code & VO_REG_MAX_CODE) as u16 * VO_REG_STEP_MV
}

/// 3-bit VO_REG code for a millivolt target
///
/// Targets outside 450..=800 mV are clamped; targets between two codes round
/// to the nearest one (halfway rounds up).
pub const fn vo_reg_code(millivolts: u16) -> u8 {
    let max_mv = vo_reg_millivolts(VO_REG_MAX_CODE);
    let clamped = if millivolts < VO_REG_BASE_MV {
        VO_REG_BASE_MV
    } else if millivolts > max_mv {
        max_mv
    } else {
        millivolts
    };
    ((clamped - VO_REG_BASE_MV + VO_REG_STEP_MV / 2) / VO_REG_STEP_MV) as u8
}

/// Current limit in percent for a 3-bit I_ILIM code
pub const fn ilim_percent(code: u8) -> u8 {
    ILIM_PERCENT[(code & 0b111) as usize]
}
