/// Static description of the chip and this driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceInfo {
    /// Chip name.
    pub chip_name: &'static str,
    /// Manufacturer name.
    pub manufacturer_name: &'static str,
    /// Host interface.
    pub interface: &'static str,
    /// Minimum supply voltage, in volts.
    pub supply_voltage_min_v: f32,
    /// Maximum supply voltage, in volts.
    pub supply_voltage_max_v: f32,
    /// Maximum current, in milliamperes.
    pub max_current_ma: f32,
    /// Minimum operating temperature, in °C.
    pub temperature_min: f32,
    /// Maximum operating temperature, in °C.
    pub temperature_max: f32,
    /// Driver version, `major * 1000 + minor * 100`.
    pub driver_version: u32,
}

const DS2431_INFO: DeviceInfo = DeviceInfo {
    chip_name: "Maxim Integrated DS2431",
    manufacturer_name: "Maxim Integrated",
    interface: "GPIO",
    supply_voltage_min_v: 2.8,
    supply_voltage_max_v: 5.25,
    max_current_ma: 0.8,
    temperature_min: -40.0,
    temperature_max: 85.0,
    driver_version: 1000,
};

/// Describe the DS2431 and this driver.
pub const fn info() -> DeviceInfo {
    DS2431_INFO
}
