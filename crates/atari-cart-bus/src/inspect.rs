use emu_core::{Observable, Value};

use crate::cartridge::Cartridge;
use crate::music::waveform_base;

fn parse_number(text: &str) -> Option<u16> {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u16::from_str_radix(hex, 16).ok()
    } else if let Some(hex) = text.strip_prefix('$') {
        u16::from_str_radix(hex, 16).ok()
    } else {
        text.parse().ok()
    }
}

/// Split `"<n>.<field>"`.
fn indexed(rest: &str) -> Option<(u8, &str)> {
    let (index, field) = rest.split_once('.')?;
    Some((u8::try_from(parse_number(index)?).ok()?, field))
}

impl Cartridge {
    fn query_voice(&self, rest: &str) -> Option<Value> {
        let (v, field) = indexed(rest)?;
        let voice = self.music.voices().get(usize::from(v))?;
        match field {
            "counter" => Some(voice.counter.into()),
            "frequency" => Some(voice.frequency.into()),
            "waveform_size" => Some(voice.waveform_size.into()),
            "waveform" => Some(waveform_base(&self.ram, v).into()),
            _ => None,
        }
    }

    fn query_stream(&self, rest: &str) -> Option<Value> {
        let (stream, field) = indexed(rest)?;
        if stream > 0x11 {
            return None;
        }
        match field {
            "pointer" => Some(self.ram.pointer(stream).into()),
            "increment" => Some(self.ram.increment(stream).into()),
            _ => None,
        }
    }
}

impl Observable for Cartridge {
    fn query(&self, path: &str) -> Option<Value> {
        if let Some(rest) = path.strip_prefix("voice.") {
            self.query_voice(rest)
        } else if let Some(rest) = path.strip_prefix("stream.") {
            self.query_stream(rest)
        } else if let Some(rest) = path.strip_prefix("map.") {
            let map = u8::try_from(parse_number(rest)?).ok()?;
            (map <= 0x24).then(|| self.ram.address_map(map).into())
        } else if let Some(rest) = path.strip_prefix("ram.") {
            let addr = usize::from(parse_number(rest)?);
            self.ram.as_bytes().get(addr).map(|&b| Value::U8(b))
        } else if let Some(rest) = path.strip_prefix("rom.") {
            let offset = parse_number(rest)?;
            let at = self.banks.image_offset(offset);
            Some(Value::U8(self.image[at]))
        } else {
            match path {
                "bank" => Some(self.banks.current().into()),
                "bank.locked" => Some(self.banks.is_locked().into()),
                "bank.changed" => Some(self.banks.is_changed().into()),
                "mode" => Some(self.mode.0.into()),
                "mode.bus_stuffing" => Some(self.mode.bus_stuffing().into()),
                "mode.digital_audio" => Some(self.mode.digital_audio().into()),
                "fast_jump.armed" => Some(self.fast_jump.armed.into()),
                "fast_jump.operand" => Some(self.fast_jump.operand.into()),
                "sty_operand" => Some(self.sty_operand.into()),
                "override.pending" => Some(self.overdrive.pending().into()),
                "cycles.system" => Some(self.system_cycles.into()),
                "cycles.arm" => Some(self.bridge.arm_cycles().into()),
                "amplitude" => Some(
                    self.music
                        .sample(&self.ram, &self.image[..], self.mode.digital_audio())
                        .into(),
                ),
                "display" => Some(self.ram.display().into()),
                "coprocessor.attached" => Some(self.bridge.has_interpreter().into()),
                "coprocessor.last_call" => self
                    .bridge
                    .last_outcome()
                    .map(|outcome| Value::String(format!("{outcome:?}"))),
                _ => None,
            }
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "bank",
            "bank.locked",
            "bank.changed",
            "mode",
            "mode.bus_stuffing",
            "mode.digital_audio",
            "fast_jump.armed",
            "fast_jump.operand",
            "sty_operand",
            "override.pending",
            "cycles.system",
            "cycles.arm",
            "amplitude",
            "display",
            "coprocessor.attached",
            "coprocessor.last_call",
            "voice.<n>.counter",
            "voice.<n>.frequency",
            "voice.<n>.waveform_size",
            "voice.<n>.waveform",
            "stream.<n>.pointer",
            "stream.<n>.increment",
            "map.<n>",
            "ram.<address>",
            "rom.<offset>",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::IMAGE_SIZE;
    use crate::config::CartConfig;
    use crate::ram::DSXPTR;

    fn cart() -> Cartridge {
        let mut image = vec![0u8; IMAGE_SIZE];
        image[0x1000 + 6 * 4096 + 0x123] = 0xA9;
        Cartridge::new(&image, CartConfig::default()).unwrap()
    }

    #[test]
    fn registers_and_tables() {
        let mut c = cart();
        c.ram_mut().set_pointer(0x10, 0x0120_0000);
        c.ram_mut().set_increment(3, 0x0180);

        assert_eq!(c.query("bank"), Some(Value::U8(6)));
        assert_eq!(c.query("mode"), Some(Value::U8(0xFF)));
        assert_eq!(c.query("stream.16.pointer"), Some(Value::U32(0x0120_0000)));
        assert_eq!(c.query("stream.$10.pointer"), Some(Value::U32(0x0120_0000)));
        assert_eq!(c.query("stream.3.increment"), Some(Value::U32(0x0180)));
        assert_eq!(c.query("stream.18.pointer"), None);
        assert_eq!(c.query("voice.2.waveform_size"), Some(Value::U8(27)));
        assert_eq!(c.query("voice.3.counter"), None);
    }

    #[test]
    fn memory_views() {
        let c = cart();
        assert_eq!(c.query("rom.0x123"), Some(Value::U8(0xA9)));
        assert_eq!(c.query(&format!("ram.{}", DSXPTR + 0x40)), Some(Value::U8(0)));
        assert_eq!(c.query("ram.0x2000"), None);
        assert_eq!(c.query("nonsense"), None);
    }

    #[test]
    fn queries_have_no_side_effects() {
        let c = cart();
        let before = c.snapshot();
        for path in ["amplitude", "stream.16.pointer", "voice.0.counter", "display"] {
            assert!(c.query(path).is_some(), "{path}");
        }
        assert_eq!(c.snapshot(), before);
    }
}
