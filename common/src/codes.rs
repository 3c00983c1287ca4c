pub const CODE_SWITCH: &str = "switch";
pub const CODE_LOCK: &str = "lock";
pub const CODE_SWING: &str = "swing";
pub const CODE_LEVEL: &str = "level";

pub const CODE_TEMP_CURRENT_C: &str = "water_temp";
pub const CODE_TEMP_CURRENT_F: &str = "temp_current_f";

pub const CODE_TEMP_SET_C: &str = "set_water_temp";
pub const CODE_TEMP_SET_F: &str = "temp_set_f";

// Capability descriptors name the Celsius set-point `temp_set`, status feeds use `set_water_temp`.
pub const FUNCTION_TEMP_SET_C: &str = "temp_set";
