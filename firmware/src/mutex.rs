//! Execution context handles and context-keyed cells.
//!
//! There are exactly two execution contexts: `main()` and the interrupt
//! handlers. A function taking a [MainCtx] argument can only be reached
//! from `main()`, one taking an [IrqCtx] only from an ISR. All shared
//! state is gated on one of the two handles, so there cannot be any
//! unsynchronized concurrency in safe code.

use core::{
    cell::{Cell, UnsafeCell},
    mem::MaybeUninit,
};

pub use crate::hw::Mutex;
pub use avr_device::interrupt::CriticalSection;

macro_rules! define_context {
    ($name:ident) => {
        pub struct $name<'cs>(CriticalSection<'cs>);

        impl<'cs> $name<'cs> {
            /// Create a new context handle.
            ///
            /// # SAFETY
            ///
            /// This may only be called from the corresponding context.
            /// `MainCtx` may only be constructed from `main()`
            /// and `IrqCtx` may only be constructed from ISRs.
            #[inline(always)]
            pub unsafe fn new() -> Self {
                // SAFETY: The cs is only handed to the low level PAC
                //         primitives. Interrupt safety is upheld by the
                //         context machinery: the main context runs with
                //         interrupts enabled, but everything an ISR can
                //         also touch is behind a `MutexCell` or an
                //         atomic.
                let cs = unsafe { CriticalSection::new() };
                fence();
                Self(cs)
            }

            /// Get the `CriticalSection` that belongs to this context.
            #[inline(always)]
            #[allow(dead_code)]
            pub fn cs(&self) -> CriticalSection<'cs> {
                self.0
            }
        }

        impl<'cs> Drop for $name<'cs> {
            #[inline(always)]
            fn drop(&mut self) {
                fence();
            }
        }
    };
}

define_context!(MainCtx);
define_context!(IrqCtx);

/// Main context initialization marker.
///
/// This marker does not have a pub constructor.
/// It is only created by [MainCtx::new_with_init].
pub struct MainInitCtx(());

impl<'cs, 'a> MainCtx<'cs> {
    /// SAFETY: The safety contract of [MainCtx::new] must be upheld.
    #[inline(always)]
    pub unsafe fn new_with_init<F: FnOnce(&'a MainInitCtx)>(f: F) -> Self {
        // SAFETY: We are creating the MainCtx.
        // Therefore, it's safe to construct the MainInitCtx marker.
        f(&MainInitCtx(()));
        // SAFETY: Safety contract of MainCtx::new is upheld by the caller.
        unsafe { Self::new() }
    }
}

pub struct AnyCtx(());

impl AnyCtx {
    /// Create a new generic context.
    #[inline(always)]
    pub fn new() -> Self {
        Self(())
    }

    /// Convert this into a [MainCtx].
    ///
    /// # SAFETY
    ///
    /// You must ensure that either:
    ///
    /// - We actually are running in main context or
    /// - If we are running in interrupt context, then everything done
    ///   with this MainCtx must be safe w.r.t. the interrupted main
    ///   context. e.g. only single-instruction hardware-word accesses.
    #[inline(always)]
    pub unsafe fn to_main_ctx<'cs>(&self) -> MainCtx<'cs> {
        // SAFETY: Upheld by the caller.
        unsafe { MainCtx::new() }
    }
}

/// Lazy initialization for static variables.
pub struct LazyMainInit<T>(UnsafeCell<MaybeUninit<T>>);

impl<T> LazyMainInit<T> {
    /// # SAFETY
    ///
    /// It must be ensured that the returned instance is initialized
    /// with a call to [Self::init] during construction of the [MainCtx].
    /// See [MainCtx::new_with_init].
    ///
    /// Using this object in any way before initializing it will
    /// result in Undefined Behavior.
    #[inline(always)]
    pub const unsafe fn uninit() -> Self {
        Self(UnsafeCell::new(MaybeUninit::uninit()))
    }

    #[inline(always)]
    pub fn init(&self, _c: &MainInitCtx, inner: T) {
        // SAFETY: We have the init marker and interrupts are not
        //         enabled, yet. Nobody else can access the cell.
        unsafe { *self.0.get() = MaybeUninit::new(inner) };
    }

    /// Get the contained value without a context handle.
    ///
    /// # SAFETY
    ///
    /// The value must have been initialized and all accesses done
    /// through the returned reference must be safe w.r.t. the context
    /// this is called from.
    #[inline(always)]
    pub unsafe fn deref_unchecked(&self) -> &T {
        // SAFETY: The `Self::uninit` contract ensures that `Self::init`
        //         ran before us.
        unsafe { (*self.0.get()).assume_init_ref() }
    }

    #[inline(always)]
    pub fn deref(&self, _m: &MainCtx<'_>) -> &T {
        // SAFETY: We have the main context handle.
        unsafe { self.deref_unchecked() }
    }

    #[inline(always)]
    #[allow(dead_code)]
    pub fn deref_irq(&self, _c: &IrqCtx<'_>) -> &T {
        // SAFETY: Initialization happened before interrupts were
        //         enabled, so an ISR can only observe the value fully
        //         initialized. Only shared access is handed out.
        unsafe { self.deref_unchecked() }
    }
}

// SAFETY: If T is Send, then we can Send the whole object. The object only contains T state.
unsafe impl<T: Send> Send for LazyMainInit<T> {}

// SAFETY: The deref functions ensure that they can only be called with
//         a valid context handle.
unsafe impl<T> Sync for LazyMainInit<T> {}

/// Optimization and reordering fence.
#[inline(always)]
pub fn fence() {
    core::sync::atomic::fence(core::sync::atomic::Ordering::SeqCst);
}

pub struct MutexCell<T> {
    inner: Mutex<Cell<T>>,
}

impl<T> MutexCell<T> {
    #[inline]
    pub const fn new(inner: T) -> Self {
        Self {
            inner: Mutex::new(Cell::new(inner)),
        }
    }
}

impl<T: Copy> MutexCell<T> {
    #[inline]
    pub fn get(&self, m: &MainCtx<'_>) -> T {
        self.inner.borrow(m.cs()).get()
    }

    #[inline]
    pub fn set(&self, m: &MainCtx<'_>, inner: T) {
        self.inner.borrow(m.cs()).set(inner);
    }
}

/// Cheaper Option::unwrap() alternative.
///
/// This is cheaper, because it doesn't call into the panic unwind path.
/// Therefore, it does not impose caller-saves overhead onto the calling function.
#[inline(always)]
pub fn unwrap_option<T>(value: Option<T>) -> T {
    match value {
        Some(value) => value,
        None => reset_system(),
    }
}

/// Reset the system.
#[inline(always)]
#[allow(clippy::empty_loop)]
pub fn reset_system() -> ! {
    loop {
        // Wait for the watchdog timer to trigger and reset the system.
        // We don't need to disable interrupts here.
        // No interrupt will reset the watchdog timer.
    }
}

#[inline(always)]
#[panic_handler]
fn panic(_: &core::panic::PanicInfo) -> ! {
    reset_system();
}

// vim: ts=4 sw=4 expandtab
