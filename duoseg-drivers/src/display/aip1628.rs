//! AiP1628 LED display controller (TM1628 compatible)
//!
//! The controller is driven over three GPIO lines with no acknowledgment,
//! so correctness depends entirely on bit order and timing.
//!
//! # Bus protocol
//!
//! ```text
//! STB ‾‾‾\_________________________________/‾‾‾
//! CLK ‾‾‾‾‾\__/‾‾\__/‾‾ ... \__/‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾
//! DIO ______X b0 X b1 X ... X b7 X_____________
//! ```
//!
//! - Bytes are sent LSB first; DIO changes while CLK is low and is latched
//!   on the rising edge
//! - Every clock and data phase is held for at least 10µs
//! - A command is one byte under a single STB assertion
//! - An addressed write is an address byte (`0xC0 | addr`) followed by the
//!   data byte, under a single STB assertion
//!
//! The two-digit module uses display RAM addresses `0x00` (tens) and
//! `0x02` (units).

use duoseg_core::config::{DisplayConfig, TimingConfig, MAX_BRIGHTNESS, MIN_SETTLE_US};
use duoseg_core::segment;
use duoseg_core::traits::DigitDisplay;
use duoseg_hal::gpio::{Level, OutputPin};
use embedded_hal::delay::DelayNs;

/// AiP1628 command bytes
pub mod cmd {
    /// Data command: write display RAM, auto-increment address
    pub const DATA_WRITE: u8 = 0x40;
    /// Display control: display off
    pub const DISPLAY_OFF: u8 = 0x80;
    /// Display control: display on, OR with brightness 0-7
    pub const DISPLAY_ON: u8 = 0x88;
    /// Address command, OR with a 4-bit RAM address
    pub const ADDRESS: u8 = 0xC0;
}

/// Display RAM address of the tens digit
pub const DIGIT1_ADDR: u8 = 0x00;

/// Display RAM address of the units digit
pub const DIGIT2_ADDR: u8 = 0x02;

/// Driver settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Aip1628Config {
    /// Hold time per bus phase (µs); raised to 10µs if lower
    pub settle_us: u32,
    /// Brightness 0-7 applied by `init`
    pub brightness: u8,
}

impl Default for Aip1628Config {
    fn default() -> Self {
        Self {
            settle_us: MIN_SETTLE_US,
            brightness: MAX_BRIGHTNESS,
        }
    }
}

impl Aip1628Config {
    pub fn from_config(timing: &TimingConfig, display: &DisplayConfig) -> Self {
        Self {
            settle_us: timing.settle_us,
            brightness: display.brightness,
        }
    }
}

/// Bit-banged AiP1628 driver
///
/// Owns the strobe, clock and data pins. Nothing else may drive them.
pub struct Aip1628<STB, CLK, DIO, D> {
    strobe: STB,
    clock: CLK,
    data: DIO,
    delay: D,
    settle_us: u32,
    brightness: u8,
}

impl<STB, CLK, DIO, D> Aip1628<STB, CLK, DIO, D>
where
    STB: OutputPin,
    CLK: OutputPin,
    DIO: OutputPin,
    D: DelayNs,
{
    /// Create a driver; call [`init`](Self::init) before anything else
    pub fn new(strobe: STB, clock: CLK, data: DIO, delay: D, config: Aip1628Config) -> Self {
        Self {
            strobe,
            clock,
            data,
            delay,
            settle_us: config.settle_us.max(MIN_SETTLE_US),
            brightness: config.brightness.min(MAX_BRIGHTNESS),
        }
    }

    /// Drive idle levels and switch the display on
    ///
    /// Idle is STB high, CLK high, DIO low. Then the data command and the
    /// display-on command with the configured brightness are sent.
    pub fn init(&mut self) {
        self.strobe.set_high();
        self.clock.set_high();
        self.data.set_low();
        self.settle();

        self.send_command(cmd::DATA_WRITE);
        self.send_command(cmd::DISPLAY_ON | self.brightness);
    }

    /// Clock out one byte, LSB first
    ///
    /// Does not touch STB; callers frame the byte.
    pub fn send_byte(&mut self, value: u8) {
        let mut bits = value;
        for _ in 0..8 {
            self.clock.set_low();
            self.settle();
            self.data.set_level(Level::from(bits & 0x01 != 0));
            self.settle();
            self.clock.set_high();
            self.settle();
            bits >>= 1;
        }
    }

    /// One-byte command frame
    pub fn send_command(&mut self, command: u8) {
        self.strobe.set_low();
        self.send_byte(command);
        self.strobe.set_high();
        self.settle();
    }

    /// Two-byte addressed write frame
    pub fn send_data(&mut self, addr: u8, value: u8) {
        self.strobe.set_low();
        self.send_byte(cmd::ADDRESS | (addr & 0x0F));
        self.send_byte(value);
        self.strobe.set_high();
        self.settle();
    }

    /// Render two digits (0-9, 10 = blank) with optional decimal points
    ///
    /// The data command is repeated before every pair; the controller
    /// expects it ahead of the addressed writes.
    pub fn display_number(&mut self, digit1: u8, digit2: u8, dot1: bool, dot2: bool) {
        let pattern1 = segment::encode(digit1, dot1);
        let pattern2 = segment::encode(digit2, dot2);

        self.send_command(cmd::DATA_WRITE);
        self.send_data(DIGIT1_ADDR, pattern1);
        self.send_data(DIGIT2_ADDR, pattern2);
    }

    /// Blank both digits
    pub fn clear(&mut self) {
        self.display_number(segment::BLANK, segment::BLANK, false, false);
    }

    /// Switch the display on at the given brightness (clamped to 0-7)
    pub fn set_brightness(&mut self, level: u8) {
        self.brightness = level.min(MAX_BRIGHTNESS);
        self.send_command(cmd::DISPLAY_ON | self.brightness);
    }

    /// Switch the display off; RAM contents are kept
    pub fn display_off(&mut self) {
        self.send_command(cmd::DISPLAY_OFF);
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Give back the pins and delay
    pub fn release(self) -> (STB, CLK, DIO, D) {
        (self.strobe, self.clock, self.data, self.delay)
    }

    fn settle(&mut self) {
        self.delay.delay_us(self.settle_us);
    }
}

impl<STB, CLK, DIO, D> DigitDisplay for Aip1628<STB, CLK, DIO, D>
where
    STB: OutputPin,
    CLK: OutputPin,
    DIO: OutputPin,
    D: DelayNs,
{
    fn display_number(&mut self, digit1: u8, digit2: u8, dot1: bool, dot2: bool) {
        Aip1628::display_number(self, digit1, digit2, dot1, dot2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;
    use duoseg_core::Digit;
    use std::vec;
    use std::vec::Vec;

    const MIN_NS: u64 = MIN_SETTLE_US as u64 * 1_000;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Line {
        Strobe,
        Clock,
        Data,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Violation {
        /// CLK rose less than 10µs after DIO changed or CLK fell
        Setup,
        /// DIO changed while CLK was high inside a frame
        DataWhileClockHigh,
        /// STB rose in the middle of a byte
        PartialByte,
        /// STB went low again less than 10µs after rising
        StrobeGap,
    }

    /// Simulated bus: decodes frames from pin writes and checks timing
    #[derive(Default)]
    struct Bus {
        now_ns: u64,
        strobe: bool,
        clock: bool,
        data: bool,
        clock_low_ns: Option<u64>,
        data_ns: Option<u64>,
        strobe_rise_ns: Option<u64>,
        /// Every write in order
        writes: Vec<(Line, bool)>,
        /// DIO level sampled at each CLK rising edge
        sampled: Vec<bool>,
        frame: Vec<u8>,
        byte: u8,
        bit_count: u8,
        frames: Vec<Vec<u8>>,
        violations: Vec<Violation>,
    }

    impl Bus {
        fn write(&mut self, line: Line, high: bool) {
            let now = self.now_ns;
            self.writes.push((line, high));

            match line {
                Line::Strobe => {
                    let was_high = self.strobe;
                    self.strobe = high;
                    if was_high && !high {
                        if self.strobe_rise_ns.is_some_and(|t| now - t < MIN_NS) {
                            self.violations.push(Violation::StrobeGap);
                        }
                        self.frame.clear();
                        self.byte = 0;
                        self.bit_count = 0;
                    } else if !was_high && high {
                        if self.bit_count != 0 {
                            self.violations.push(Violation::PartialByte);
                        }
                        if !self.frame.is_empty() {
                            self.frames.push(core::mem::take(&mut self.frame));
                        }
                        self.strobe_rise_ns = Some(now);
                    }
                }
                Line::Clock => {
                    let was_high = self.clock;
                    self.clock = high;
                    if !high && (was_high || self.clock_low_ns.is_none()) {
                        self.clock_low_ns = Some(now);
                    } else if high && !was_high {
                        let low_ok = self.clock_low_ns.map_or(true, |t| now - t >= MIN_NS);
                        let setup_ok = self.data_ns.map_or(true, |t| now - t >= MIN_NS);
                        if !low_ok || !setup_ok {
                            self.violations.push(Violation::Setup);
                        }
                        self.sampled.push(self.data);
                        if !self.strobe {
                            self.byte |= (self.data as u8) << self.bit_count;
                            self.bit_count += 1;
                            if self.bit_count == 8 {
                                self.frame.push(self.byte);
                                self.byte = 0;
                                self.bit_count = 0;
                            }
                        }
                    }
                }
                Line::Data => {
                    if self.clock && !self.strobe {
                        self.violations.push(Violation::DataWhileClockHigh);
                    }
                    self.data = high;
                    self.data_ns = Some(now);
                }
            }
        }

        fn level(&self, line: Line) -> bool {
            match line {
                Line::Strobe => self.strobe,
                Line::Clock => self.clock,
                Line::Data => self.data,
            }
        }

        fn clock_pulses(&self) -> usize {
            self.sampled.len()
        }

        fn reset_capture(&mut self) {
            self.writes.clear();
            self.sampled.clear();
            self.frames.clear();
            self.violations.clear();
        }
    }

    struct BusPin<'a> {
        line: Line,
        bus: &'a RefCell<Bus>,
    }

    impl OutputPin for BusPin<'_> {
        fn set_high(&mut self) {
            self.bus.borrow_mut().write(self.line, true);
        }

        fn set_low(&mut self) {
            self.bus.borrow_mut().write(self.line, false);
        }

        fn is_set_high(&self) -> bool {
            self.bus.borrow().level(self.line)
        }
    }

    struct BusDelay<'a> {
        bus: &'a RefCell<Bus>,
    }

    impl DelayNs for BusDelay<'_> {
        fn delay_ns(&mut self, ns: u32) {
            self.bus.borrow_mut().now_ns += ns as u64;
        }
    }

    type TestDriver<'a> = Aip1628<BusPin<'a>, BusPin<'a>, BusPin<'a>, BusDelay<'a>>;

    fn driver(bus: &RefCell<Bus>, config: Aip1628Config) -> TestDriver<'_> {
        Aip1628::new(
            BusPin { line: Line::Strobe, bus },
            BusPin { line: Line::Clock, bus },
            BusPin { line: Line::Data, bus },
            BusDelay { bus },
            config,
        )
    }

    fn initialized(bus: &RefCell<Bus>) -> TestDriver<'_> {
        let mut display = driver(bus, Aip1628Config::default());
        display.init();
        bus.borrow_mut().reset_capture();
        display
    }

    #[test]
    fn test_send_byte_lsb_first() {
        for value in [0x00u8, 0xFF, 0xA5, 0x01, 0x80, 0x5D] {
            let bus = RefCell::new(Bus::default());
            let mut display = driver(&bus, Aip1628Config::default());

            display.send_byte(value);

            let bus = bus.borrow();
            assert_eq!(bus.clock_pulses(), 8, "value {:#04x}", value);
            for (i, &bit) in bus.sampled.iter().enumerate() {
                assert_eq!(bit, (value >> i) & 1 == 1, "value {:#04x} bit {}", value, i);
            }
            assert!(bus.violations.is_empty());
        }
    }

    #[test]
    fn test_send_byte_phase_order() {
        let bus = RefCell::new(Bus::default());
        let mut display = driver(&bus, Aip1628Config::default());

        display.send_byte(0x01);

        let bus = bus.borrow();
        assert_eq!(
            &bus.writes[..6],
            &[
                (Line::Clock, false),
                (Line::Data, true),
                (Line::Clock, true),
                (Line::Clock, false),
                (Line::Data, false),
                (Line::Clock, true),
            ]
        );
        assert!(bus.writes.iter().all(|(line, _)| *line != Line::Strobe));
    }

    #[test]
    fn test_init_sets_idle_levels_then_commands() {
        let bus = RefCell::new(Bus::default());
        let mut display = driver(&bus, Aip1628Config::default());

        display.init();

        let bus = bus.borrow();
        assert_eq!(
            &bus.writes[..3],
            &[(Line::Strobe, true), (Line::Clock, true), (Line::Data, false)]
        );
        assert_eq!(bus.frames, vec![vec![0x40], vec![0x8F]]);
        assert!(bus.violations.is_empty(), "{:?}", bus.violations);
        assert!(bus.strobe);
    }

    #[test]
    fn test_send_command_and_data_framing() {
        let bus = RefCell::new(Bus::default());
        let mut display = initialized(&bus);

        display.send_command(0x40);
        display.send_data(0x02, 0x5D);
        display.send_data(0x13, 0x00); // address masked to 4 bits

        let bus = bus.borrow();
        assert_eq!(bus.frames, vec![vec![0x40], vec![0xC2, 0x5D], vec![0xC3, 0x00]]);
        assert!(bus.violations.is_empty(), "{:?}", bus.violations);
    }

    #[test]
    fn test_display_number_frames() {
        let bus = RefCell::new(Bus::default());
        let mut display = initialized(&bus);

        display.display_number(4, 5, false, false);

        let bus = bus.borrow();
        assert_eq!(
            bus.frames,
            vec![
                vec![0x40],
                vec![0xC0, segment::encode(4, false)],
                vec![0xC2, segment::encode(5, false)],
            ]
        );
        assert_eq!(bus.clock_pulses(), 5 * 8);
        assert!(bus.violations.is_empty(), "{:?}", bus.violations);
    }

    #[test]
    fn test_display_number_with_dots() {
        let bus = RefCell::new(Bus::default());
        let mut display = initialized(&bus);

        display.display_number(1, 2, true, false);

        let bus = bus.borrow();
        assert_eq!(bus.frames[1], vec![0xC0, 0x88 | 0x20]);
        assert_eq!(bus.frames[2], vec![0xC2, 0x5D]);
    }

    #[test]
    fn test_clear_and_trait_rendering() {
        let bus = RefCell::new(Bus::default());
        let mut display = initialized(&bus);

        display.clear();
        DigitDisplay::show(&mut display, Digit::new(7).unwrap(), Digit::BLANK);

        let bus = bus.borrow();
        assert_eq!(
            bus.frames,
            vec![
                vec![0x40],
                vec![0xC0, 0x00],
                vec![0xC2, 0x00],
                vec![0x40],
                vec![0xC0, 0x8C],
                vec![0xC2, 0x00],
            ]
        );
    }

    #[test]
    fn test_brightness_and_display_off() {
        let bus = RefCell::new(Bus::default());
        let mut display = initialized(&bus);

        display.set_brightness(3);
        display.set_brightness(9);
        display.display_off();

        assert_eq!(display.brightness(), 7);
        assert_eq!(bus.borrow().frames, vec![vec![0x8B], vec![0x8F], vec![0x80]]);
    }

    #[test]
    fn test_configured_brightness_used_by_init() {
        let bus = RefCell::new(Bus::default());
        let mut display = driver(
            &bus,
            Aip1628Config {
                settle_us: 10,
                brightness: 2,
            },
        );

        display.init();
        assert_eq!(bus.borrow().frames, vec![vec![0x40], vec![0x8A]]);
    }

    #[test]
    fn test_settle_time_never_below_minimum() {
        let bus = RefCell::new(Bus::default());
        let mut display = driver(
            &bus,
            Aip1628Config {
                settle_us: 1,
                brightness: 7,
            },
        );

        display.init();
        display.display_number(8, 8, true, true);

        let bus = bus.borrow();
        assert!(bus.violations.is_empty(), "{:?}", bus.violations);
        // 3 phases per bit, 8 bits per byte
        assert!(bus.now_ns >= 7 * 8 * 3 * MIN_NS);
    }
}
