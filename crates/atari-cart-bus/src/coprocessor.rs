//! Bridge to the ARM coprocessor.
//!
//! The cartridge does not interpret ARM code itself. A host supplies an
//! interpreter through the [`Coprocessor`] trait; the bridge hands it a
//! cycle budget, the cartridge memory and the music callbacks for the
//! duration of one call, and turns whatever it reports into a
//! [`CallOutcome`].

use std::fmt;

use thiserror::Error;

use crate::config::ConsoleTiming;

/// `CALLFN` value that runs the ARM code.
pub const CALL_RUN: u8 = 0xFF;
/// `CALLFN` value that runs the ARM code, with the 6507 expected to poll for
/// completion. Emulated identically.
pub const CALL_RUN_POLLED: u8 = 0xFE;

/// Services the ARM code reaches through the driver's callback trampoline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackOp {
    /// Set a voice's frequency.
    SetNote,
    /// Zero a voice's counter.
    ResetWave,
    /// Read a voice's counter.
    GetWavePtr,
    /// Set a voice's waveform size shift.
    SetWaveSize,
}

impl CallbackOp {
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::SetNote),
            1 => Some(Self::ResetWave),
            2 => Some(Self::GetWavePtr),
            3 => Some(Self::SetWaveSize),
            _ => None,
        }
    }
}

/// Receiver of ARM callbacks.
pub trait Callbacks {
    fn callback(&mut self, op: CallbackOp, voice: u32, value: u32) -> u32;

    /// Dispatch a raw callback code. Unknown codes do nothing and return 0.
    fn callback_code(&mut self, code: u8, voice: u32, value: u32) -> u32 {
        match CallbackOp::from_code(code) {
            Some(op) => self.callback(op, voice, value),
            None => {
                log::debug!("ignoring unknown ARM callback {code}");
                0
            }
        }
    }
}

/// Cartridge memory as the ARM sees it for one call.
pub struct CoprocessorMemory<'a> {
    /// The full 32K flash image, driver included.
    pub rom: &'a [u8],
    /// Harmony RAM. Writes are visible to the 6507 immediately after the call.
    pub ram: &'a mut [u8],
}

/// Why an ARM call did not complete.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoprocessorFault {
    #[error("ARM fault at PC {pc:#010X}: {reason}")]
    Exception { pc: u32, reason: String },
    #[error("ARM interpreter error: {0}")]
    Interpreter(String),
}

/// An ARM Thumb interpreter.
pub trait Coprocessor {
    /// Run the ARM code from the driver's entry point until it returns or
    /// `budget` 6507 cycles have been spent.
    fn run(
        &mut self,
        budget: u32,
        memory: CoprocessorMemory<'_>,
        callbacks: &mut dyn Callbacks,
    ) -> Result<(), CoprocessorFault>;

    fn set_console_timing(&mut self, _timing: ConsoleTiming) {}

    /// Whether invalid memory accesses stop the run with a fault.
    fn set_trap_fatal(&mut self, _trap: bool) {}
}

/// Receives faults that should reach the user, typically a debugger that
/// stops emulation and shows the message.
pub trait FaultHandler {
    fn report(&mut self, fault: &CoprocessorFault);
}

/// Result of a `CALLFN` write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    Completed,
    /// Not a run request, or no interpreter is attached.
    Skipped,
    /// The call faulted and the fault was passed on.
    Reported(CoprocessorFault),
    /// The call faulted while the host was detecting the image format.
    Absorbed,
}

#[derive(Default)]
pub struct Bridge {
    interpreter: Option<Box<dyn Coprocessor>>,
    fault_handler: Option<Box<dyn FaultHandler>>,
    /// Host cycle count at the end of the last run.
    arm_cycles: u32,
    last_outcome: Option<CallOutcome>,
}

impl Bridge {
    pub fn attach(&mut self, interpreter: Box<dyn Coprocessor>) {
        self.interpreter = Some(interpreter);
    }

    pub fn set_fault_handler(&mut self, handler: Box<dyn FaultHandler>) {
        self.fault_handler = Some(handler);
    }

    #[must_use]
    pub fn has_interpreter(&self) -> bool {
        self.interpreter.is_some()
    }

    #[must_use]
    pub fn arm_cycles(&self) -> u32 {
        self.arm_cycles
    }

    pub fn set_arm_cycles(&mut self, cycles: u32) {
        self.arm_cycles = cycles;
    }

    #[must_use]
    pub fn last_outcome(&self) -> Option<&CallOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn set_console_timing(&mut self, timing: ConsoleTiming) {
        if let Some(arm) = self.interpreter.as_mut() {
            arm.set_console_timing(timing);
        }
    }

    /// Handle a `CALLFN` write of `code` at host cycle `now`.
    pub fn call(
        &mut self,
        code: u8,
        now: u32,
        autodetect: bool,
        memory: CoprocessorMemory<'_>,
        callbacks: &mut dyn Callbacks,
    ) -> CallOutcome {
        let outcome = self.dispatch(code, now, autodetect, memory, callbacks);
        self.last_outcome = Some(outcome.clone());
        outcome
    }

    fn dispatch(
        &mut self,
        code: u8,
        now: u32,
        autodetect: bool,
        memory: CoprocessorMemory<'_>,
        callbacks: &mut dyn Callbacks,
    ) -> CallOutcome {
        if code != CALL_RUN && code != CALL_RUN_POLLED {
            return CallOutcome::Skipped;
        }
        let budget = now.wrapping_sub(self.arm_cycles);
        self.arm_cycles = now;

        let Some(arm) = self.interpreter.as_mut() else {
            log::trace!("CALLFN {code:#04X} with no ARM interpreter attached");
            return CallOutcome::Skipped;
        };
        match arm.run(budget, memory, callbacks) {
            Ok(()) => CallOutcome::Completed,
            Err(_) if autodetect => CallOutcome::Absorbed,
            Err(fault) => {
                match self.fault_handler.as_mut() {
                    Some(handler) => handler.report(&fault),
                    None => log::error!("{fault}"),
                }
                CallOutcome::Reported(fault)
            }
        }
    }
}

impl fmt::Debug for Bridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bridge")
            .field("interpreter", &self.interpreter.is_some())
            .field("fault_handler", &self.fault_handler.is_some())
            .field("arm_cycles", &self.arm_cycles)
            .field("last_outcome", &self.last_outcome)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct NoCallbacks;

    impl Callbacks for NoCallbacks {
        fn callback(&mut self, _op: CallbackOp, _voice: u32, _value: u32) -> u32 {
            0
        }
    }

    /// Records budgets and fails when asked to.
    struct Scripted {
        budgets: Rc<RefCell<Vec<u32>>>,
        fail: bool,
    }

    impl Coprocessor for Scripted {
        fn run(
            &mut self,
            budget: u32,
            memory: CoprocessorMemory<'_>,
            _callbacks: &mut dyn Callbacks,
        ) -> Result<(), CoprocessorFault> {
            self.budgets.borrow_mut().push(budget);
            memory.ram[0] = memory.rom[0];
            if self.fail {
                Err(CoprocessorFault::Exception {
                    pc: 0x0000_0C00,
                    reason: "undefined instruction".into(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn bridge(fail: bool) -> (Bridge, Rc<RefCell<Vec<u32>>>) {
        let budgets = Rc::new(RefCell::new(Vec::new()));
        let mut bridge = Bridge::default();
        bridge.attach(Box::new(Scripted {
            budgets: Rc::clone(&budgets),
            fail,
        }));
        (bridge, budgets)
    }

    fn call(bridge: &mut Bridge, code: u8, now: u32, autodetect: bool) -> CallOutcome {
        let rom = [0x42u8; 4];
        let mut ram = [0u8; 4];
        bridge.call(
            code,
            now,
            autodetect,
            CoprocessorMemory {
                rom: &rom,
                ram: &mut ram,
            },
            &mut NoCallbacks,
        )
    }

    #[test]
    fn budget_is_cycles_since_previous_run() {
        let (mut b, budgets) = bridge(false);
        assert_eq!(call(&mut b, CALL_RUN, 100, false), CallOutcome::Completed);
        assert_eq!(call(&mut b, CALL_RUN_POLLED, 250, false), CallOutcome::Completed);
        assert_eq!(*budgets.borrow(), [100, 150]);
        assert_eq!(b.arm_cycles(), 250);
    }

    #[test]
    fn budget_wraps_with_the_host_counter() {
        let (mut b, budgets) = bridge(false);
        b.set_arm_cycles(u32::MAX - 9);
        call(&mut b, CALL_RUN, 10, false);
        assert_eq!(*budgets.borrow(), [20]);
    }

    #[test]
    fn other_codes_are_ignored() {
        let (mut b, budgets) = bridge(false);
        assert_eq!(call(&mut b, 0x00, 500, false), CallOutcome::Skipped);
        assert_eq!(call(&mut b, 0xFD, 500, false), CallOutcome::Skipped);
        assert!(budgets.borrow().is_empty());
        assert_eq!(b.arm_cycles(), 0);
    }

    #[test]
    fn faults_are_reported_or_absorbed() {
        let (mut b, _) = bridge(true);
        assert!(matches!(
            call(&mut b, CALL_RUN, 1, false),
            CallOutcome::Reported(CoprocessorFault::Exception { pc: 0x0C00, .. })
        ));
        assert_eq!(call(&mut b, CALL_RUN, 2, true), CallOutcome::Absorbed);
        assert_eq!(b.last_outcome(), Some(&CallOutcome::Absorbed));
    }

    #[test]
    fn fault_handler_receives_reported_faults() {
        struct Collect(Rc<RefCell<Vec<String>>>);
        impl FaultHandler for Collect {
            fn report(&mut self, fault: &CoprocessorFault) {
                self.0.borrow_mut().push(fault.to_string());
            }
        }

        let seen = Rc::new(RefCell::new(Vec::new()));
        let (mut b, _) = bridge(true);
        b.set_fault_handler(Box::new(Collect(Rc::clone(&seen))));
        call(&mut b, CALL_RUN, 1, true);
        assert!(seen.borrow().is_empty());
        call(&mut b, CALL_RUN, 2, false);
        assert_eq!(
            *seen.borrow(),
            ["ARM fault at PC 0x00000C00: undefined instruction"]
        );
    }

    #[test]
    fn no_interpreter_skips_but_consumes_budget() {
        let mut b = Bridge::default();
        assert_eq!(call(&mut b, CALL_RUN, 77, false), CallOutcome::Skipped);
        assert_eq!(b.arm_cycles(), 77);
    }

    #[test]
    fn unknown_callback_codes_return_zero() {
        struct Echo;
        impl Callbacks for Echo {
            fn callback(&mut self, _op: CallbackOp, voice: u32, _value: u32) -> u32 {
                voice + 1
            }
        }
        assert_eq!(Echo.callback_code(2, 4, 0), 5);
        assert_eq!(Echo.callback_code(9, 4, 0), 0);
    }
}
