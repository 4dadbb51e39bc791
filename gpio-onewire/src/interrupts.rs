use critical_section::RestoreState;

/// Interrupt control injected by the platform.
///
/// Bit-banged time slots are only correct if nothing preempts them, so the
/// master disables interrupts around every byte, bit pair and reset. It only
/// does so through [`CriticalSection`], which re-enables on every exit path.
pub trait Interrupts {
    /// Disable interrupts.
    fn disable(&mut self);
    /// Re-enable interrupts.
    fn enable(&mut self);
}

impl<T: Interrupts + ?Sized> Interrupts for &mut T {
    fn disable(&mut self) {
        (**self).disable()
    }

    fn enable(&mut self) {
        (**self).enable()
    }
}

/// Scoped interrupt lock: disabled on [`CriticalSection::enter`], re-enabled on drop.
pub struct CriticalSection<'a, I: Interrupts> {
    irq: &'a mut I,
}

impl<'a, I: Interrupts> CriticalSection<'a, I> {
    /// Disable interrupts until the returned guard is dropped.
    pub fn enter(irq: &'a mut I) -> Self {
        irq.disable();
        Self { irq }
    }
}

impl<I: Interrupts> Drop for CriticalSection<'_, I> {
    fn drop(&mut self) {
        self.irq.enable();
    }
}

/// [`Interrupts`] backed by the [`critical_section`] crate, so the platform's
/// registered critical-section implementation decides how interrupts are masked.
#[derive(Default)]
pub struct GlobalInterrupts {
    restore: Option<RestoreState>,
}

impl core::fmt::Debug for GlobalInterrupts {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GlobalInterrupts")
            .field("held", &self.restore.is_some())
            .finish()
    }
}

impl GlobalInterrupts {
    /// Create an instance that holds no lock.
    pub const fn new() -> Self {
        Self { restore: None }
    }
}

impl Interrupts for GlobalInterrupts {
    fn disable(&mut self) {
        if self.restore.is_none() {
            // SAFETY: released exactly once in `enable`, in acquisition order
            self.restore = Some(unsafe { critical_section::acquire() });
        }
    }

    fn enable(&mut self) {
        if let Some(restore) = self.restore.take() {
            // SAFETY: `restore` came from the matching `acquire` above
            unsafe { critical_section::release(restore) };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        depth: i32,
        entered: usize,
    }

    impl Interrupts for Counter {
        fn disable(&mut self) {
            self.depth += 1;
            self.entered += 1;
        }

        fn enable(&mut self) {
            self.depth -= 1;
        }
    }

    fn fails_inside(irq: &mut Counter) -> Result<(), ()> {
        let _cs = CriticalSection::enter(irq);
        Err(())
    }

    #[test]
    fn guard_releases_on_early_return() {
        let mut irq = Counter::default();
        assert!(fails_inside(&mut irq).is_err());
        assert_eq!(irq.depth, 0);
        assert_eq!(irq.entered, 1);
    }

    #[test]
    fn global_interrupts_round_trip() {
        let mut irq = GlobalInterrupts::new();
        {
            let _cs = CriticalSection::enter(&mut irq);
        }
        assert!(irq.restore.is_none());
        // a second disable while held is ignored
        irq.disable();
        irq.disable();
        irq.enable();
        assert!(irq.restore.is_none());
    }
}
