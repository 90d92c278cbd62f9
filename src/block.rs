//! The single heap block the harness holds while it sleeps.

use std::ptr;

/// Blok paměti z `libc::malloc`, uvolněný právě jednou v `Drop`.
///
/// Výsledek malloc se nekontroluje jako chyba: null blok je platný stav
/// a jeho uvolnění je no-op (free(NULL)).
pub struct HeldBlock {
    ptr: *mut libc::c_void,
    len: usize,
}

impl HeldBlock {
    pub fn allocate(byte_count: i64, touch_pages: bool) -> Self {
        // stejná implicitní konverze int64 -> size_t jako v C;
        // záporná velikost je obří a malloc vrátí NULL
        let len = byte_count as usize;
        let ptr = unsafe { libc::malloc(len) };

        let block = Self { ptr, len };
        if touch_pages {
            block.touch();
        }
        block
    }

    pub fn is_null(&self) -> bool {
        self.ptr.is_null()
    }

    /// Requested size in bytes, after the `size_t` conversion.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Zapíše jeden bajt na každou stránku, aby se blok promítl do RSS.
    fn touch(&self) {
        if self.ptr.is_null() {
            return;
        }

        let base = self.ptr.cast::<u8>();
        let page = page_size();
        let mut offset = 0usize;
        while offset < self.len {
            unsafe { ptr::write_volatile(base.add(offset), 1) };
            offset = match offset.checked_add(page) {
                Some(next) => next,
                None => break,
            };
        }
    }
}

impl Drop for HeldBlock {
    fn drop(&mut self) {
        unsafe { libc::free(self.ptr) };
        self.ptr = ptr::null_mut();
    }
}

fn page_size() -> usize {
    // fallback, kdyby sysconf selhal
    let p = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if p <= 0 { 4096 } else { p as usize }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_allocation_succeeds() {
        let block = HeldBlock::allocate(1024, false);
        assert!(!block.is_null());
        assert_eq!(block.len(), 1024);
    }

    #[test]
    fn negative_size_yields_null_block() {
        let block = HeldBlock::allocate(-5, false);
        assert!(block.is_null());
        // drop null bloku nesmí spadnout
        drop(block);
    }

    #[test]
    fn zero_size_is_harmless() {
        let block = HeldBlock::allocate(0, true);
        assert_eq!(block.len(), 0);
    }

    #[test]
    fn touching_pages_covers_whole_block() {
        let len = page_size() * 8 + 3;
        let block = HeldBlock::allocate(len as i64, true);
        assert!(!block.is_null());

        let base = block.ptr.cast::<u8>();
        let page = page_size();
        for i in 0..=8 {
            let v = unsafe { ptr::read_volatile(base.add(i * page)) };
            assert_eq!(v, 1);
        }
    }

    #[test]
    fn touching_null_block_is_noop() {
        let block = HeldBlock::allocate(i64::MIN, true);
        assert!(block.is_null());
    }

    #[test]
    fn page_size_is_sane() {
        let p = page_size();
        assert!(p >= 4096);
        assert!(p.is_power_of_two());
    }
}
