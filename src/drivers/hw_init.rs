//! One-shot hardware peripheral initialization.
//!
//! Powers the sensor rail, configures the three ADC1 channels and the user
//! button input using raw ESP-IDF sys calls.  Called once from `main()`
//! before any sensor driver is touched.
//!
//! On the host the ADC is backed by atomics that tests set through
//! [`sim_set_adc1`].

#[cfg(target_os = "espidf")]
use esp_idf_sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
        }
    }
}

impl core::error::Error for HwInitError {}

impl From<HwInitError> for crate::error::Error {
    fn from(e: HwInitError) -> Self {
        match e {
            HwInitError::AdcInitFailed(_) => Self::Init("ADC1 init failed"),
            HwInitError::GpioConfigFailed(_) => Self::Init("GPIO config failed"),
        }
    }
}

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the loop starts; single-threaded.
    unsafe {
        init_power_rail()?;
        init_adc()?;
        init_button()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── Sensor power rail ─────────────────────────────────────────

/// Drive the rail enable HIGH and wait for the sensors to come up.
/// Nothing on the I²C bus answers before this.
#[cfg(target_os = "espidf")]
unsafe fn init_power_rail() -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::POWER_CTRL_GPIO,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    unsafe { gpio_set_level(pins::POWER_CTRL_GPIO, 1) };
    esp_idf_hal::delay::FreeRtos::delay_ms(pins::POWER_SETTLE_MS);
    info!(
        "hw_init: sensor rail on (GPIO{}), settled {}ms",
        pins::POWER_CTRL_GPIO,
        pins::POWER_SETTLE_MS
    );
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// main-loop ADC read path.  `init_adc()` completes before the loop starts.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    // 12 dB attenuation: full 0..3.3 V input range.
    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };

    for channel in [
        pins::ADC1_CH_SOIL,
        pins::ADC1_CH_BATTERY,
        pins::ADC1_CH_SALINITY,
    ] {
        let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), channel, &chan_cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::AdcInitFailed(ret));
        }
    }

    info!(
        "hw_init: ADC1 configured (CH{}=soil, CH{}=battery, CH{}=salinity)",
        pins::ADC1_CH_SOIL,
        pins::ADC1_CH_BATTERY,
        pins::ADC1_CH_SALINITY
    );
    Ok(())
}

/// Read one raw 12-bit sample.  A failed conversion reads as 0.
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> u16 {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract: single-threaded main-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return 0;
    }
    raw.clamp(0, 4095) as u16
}

#[cfg(not(target_os = "espidf"))]
static SIM_ADC1: [core::sync::atomic::AtomicU16; 8] =
    [const { core::sync::atomic::AtomicU16::new(0) }; 8];

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(channel: u32) -> u16 {
    SIM_ADC1
        .get(channel as usize)
        .map_or(0, |v| v.load(core::sync::atomic::Ordering::Relaxed))
}

/// Set the value the simulated ADC1 returns for `channel` (host only).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_adc1(channel: u32, raw: u16) {
    if let Some(v) = SIM_ADC1.get(channel as usize) {
        v.store(raw.min(4095), core::sync::atomic::Ordering::Relaxed);
    }
}

// ── User button ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_button() -> Result<(), HwInitError> {
    // GPIO35 is input-only with no internal pull resistors; the board
    // carries an external pull-up.
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::USER_BUTTON_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    info!("hw_init: button input on GPIO{}", pins::USER_BUTTON_GPIO);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: read-only register access on an already-configured input pin.
    (unsafe { gpio_get_level(pin) }) != 0
}

/// Host: every input idles high (pull-up, button released).
#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_adc_is_settable_and_clamped() {
        sim_set_adc1(7, 1234);
        assert_eq!(adc1_read(7), 1234);
        sim_set_adc1(7, 9999);
        assert_eq!(adc1_read(7), 4095);
        assert_eq!(adc1_read(42), 0);
    }

    #[test]
    fn init_errors_fold_into_crate_error() {
        let e: crate::error::Error = HwInitError::GpioConfigFailed(-1).into();
        assert_eq!(e, crate::error::Error::Init("GPIO config failed"));
    }

    #[test]
    fn sim_init_succeeds() {
        assert_eq!(init_peripherals(), Ok(()));
    }
}
