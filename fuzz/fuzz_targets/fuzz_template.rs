#![no_main]
use libfuzzer_sys::fuzz_target;

use stache::{Context, Engine, Escape};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = Engine::one_off(s, &Context::new(), Escape::Html);
    }
});
