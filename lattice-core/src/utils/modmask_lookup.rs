use bitflags::bitflags;
use serde::{de::Visitor, Deserialize, Serialize};

bitflags! {
    /// Modifier keys held down during a key or button event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ModMask: u16 {
        const Shift = 1;
        /// Caps lock. Ignored when matching bindings.
        const Lock = 1 << 1;
        const Control = 1 << 2;
        /// Usually Alt.
        const Mod1 = 1 << 3;
        /// Usually Num lock. Ignored when matching bindings.
        const Mod2 = 1 << 4;
        const Mod3 = 1 << 5;
        /// Usually Super.
        const Mod4 = 1 << 6;
        const Mod5 = 1 << 7;
    }
}

bitflags! {
    /// Pointer buttons.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Button: u8 {
        /// Left click for right-handed setups.
        const Button1 = 1;
        /// Pressing the scroll wheel.
        const Button2 = 1 << 1;
        const Button3 = 1 << 2;
        const Button4 = 1 << 3;
        const Button5 = 1 << 4;
    }
}

impl ModMask {
    /// Drops the lock modifiers, which never take part in a binding.
    #[must_use]
    pub fn clean(self) -> Self {
        self - (Self::Lock | Self::Mod2)
    }
}

impl Button {
    /// The button with the core protocol number `n` (1 based).
    #[must_use]
    pub fn from_number(n: u32) -> Self {
        match n {
            1 => Self::Button1,
            2 => Self::Button2,
            3 => Self::Button3,
            4 => Self::Button4,
            5 => Self::Button5,
            _ => Self::empty(),
        }
    }
}

/// Builds a modifier mask from names such as `Mod4` or `Shift`. Unknown names are ignored.
#[must_use]
pub fn into_modmask(keys: &[String]) -> ModMask {
    keys.iter()
        .fold(ModMask::empty(), |mask, key| mask | into_mod(key))
        .clean()
}

#[must_use]
pub fn into_mod(key: &str) -> ModMask {
    match key {
        "Shift" => ModMask::Shift,
        "Control" | "Ctrl" => ModMask::Control,
        "Mod1" | "Alt" => ModMask::Mod1,
        "Mod3" => ModMask::Mod3,
        "Mod4" | "Super" => ModMask::Mod4,
        "Mod5" => ModMask::Mod5,
        _ => ModMask::empty(),
    }
}

// serde impls (derive is not working with the bitflags macro)

impl Serialize for ModMask {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u16(self.bits())
    }
}

impl<'de> Deserialize<'de> for ModMask {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct ModmaskVisitor;

        impl<'de> Visitor<'de> for ModmaskVisitor {
            type Value = ModMask;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a bitfield on 16 bits")
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                u16::try_from(v)
                    .map(ModMask::from_bits_truncate)
                    .map_err(|_| E::custom("modifier mask out of range"))
            }
        }

        deserializer.deserialize_u16(ModmaskVisitor)
    }
}

impl Serialize for Button {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.bits())
    }
}

impl<'de> Deserialize<'de> for Button {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct ButtonVisitor;

        impl<'de> Visitor<'de> for ButtonVisitor {
            type Value = Button;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a bitfield on 8 bits")
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                u8::try_from(v)
                    .map(Button::from_bits_truncate)
                    .map_err(|_| E::custom("button mask out of range"))
            }
        }

        deserializer.deserialize_u8(ButtonVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_modifiers_are_ignored() {
        let names = vec!["Mod4".to_owned(), "Shift".to_owned(), "NumLock".to_owned()];
        assert_eq!(into_modmask(&names), ModMask::Mod4 | ModMask::Shift);
        assert_eq!((ModMask::Mod1 | ModMask::Mod2 | ModMask::Lock).clean(), ModMask::Mod1);
    }

    #[test]
    fn masks_survive_json() {
        let mask = ModMask::Mod4 | ModMask::Control;
        let json = serde_json::to_string(&mask).unwrap();
        assert_eq!(serde_json::from_str::<ModMask>(&json).unwrap(), mask);
        let button: Button = serde_json::from_str("4").unwrap();
        assert_eq!(button, Button::Button3);
    }
}
