//! Per-context configuration read by both the compiler and the VM.

/// Side count used when neither the roll nor the flags name one.
pub const DEFAULT_DICE_SIDES: i64 = 100;

/// Roll options. Persisted on the context between runs; directive comments
/// (`// #EnableDiceWoD true`) may change them while compiling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Flags {
    /// Every die lands on its lowest face.
    pub dice_min_mode: bool,
    /// Every die lands on its highest face.
    pub dice_max_mode: bool,
    /// Reject bare-name loads (`.r reason` text that would otherwise read variables).
    pub disable_load_varname: bool,
    /// Division by zero yields the dividend instead of failing.
    pub ignore_div0: bool,
    pub default_dice_sides: i64,
    /// Log every executed instruction at trace level.
    pub print_bytecode: bool,
    pub enable_dice_wod: bool,
    pub enable_dice_coc: bool,
    pub enable_dice_fate: bool,
    pub enable_dice_double_cross: bool,
}

impl Default for Flags {
    fn default() -> Self {
        Self {
            dice_min_mode: false,
            dice_max_mode: false,
            disable_load_varname: false,
            ignore_div0: false,
            default_dice_sides: DEFAULT_DICE_SIDES,
            print_bytecode: false,
            enable_dice_wod: false,
            enable_dice_coc: false,
            enable_dice_fate: false,
            enable_dice_double_cross: false,
        }
    }
}

impl Flags {
    /// Effective side count for a roll without an explicit one.
    pub fn dice_sides(&self) -> i64 {
        if self.default_dice_sides > 0 {
            self.default_dice_sides
        } else {
            DEFAULT_DICE_SIDES
        }
    }

    /// Apply a `// #Name value` directive. An empty value means `true`.
    pub fn apply_directive(&mut self, name: &str, value: &str) -> Result<(), String> {
        if name == "DefaultDiceSideNum" {
            self.default_dice_sides = value
                .parse()
                .map_err(|_| format!("directive {name} expects an integer, got '{value}'"))?;
            return Ok(());
        }
        let on = match value {
            "" | "true" | "1" | "on" => true,
            "false" | "0" | "off" => false,
            _ => return Err(format!("directive {name} expects a bool, got '{value}'")),
        };
        let slot = match name {
            "DiceMinMode" => &mut self.dice_min_mode,
            "DiceMaxMode" => &mut self.dice_max_mode,
            "DisableLoadVarname" => &mut self.disable_load_varname,
            "IgnoreDiv0" => &mut self.ignore_div0,
            "PrintBytecode" => &mut self.print_bytecode,
            "EnableDiceWoD" => &mut self.enable_dice_wod,
            "EnableDiceCoC" => &mut self.enable_dice_coc,
            "EnableDiceFate" => &mut self.enable_dice_fate,
            "EnableDiceDoubleCross" => &mut self.enable_dice_double_cross,
            _ => return Err(format!("unknown directive {name}")),
        };
        *slot = on;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_toggle_flags() {
        let mut flags = Flags::default();
        flags.apply_directive("EnableDiceWoD", "true").unwrap();
        assert!(flags.enable_dice_wod);
        flags.apply_directive("EnableDiceWoD", "false").unwrap();
        assert!(!flags.enable_dice_wod);
        flags.apply_directive("DefaultDiceSideNum", "20").unwrap();
        assert_eq!(flags.dice_sides(), 20);
        assert!(flags.apply_directive("NoSuchFlag", "true").is_err());
        assert!(flags.apply_directive("IgnoreDiv0", "maybe").is_err());
    }
}
