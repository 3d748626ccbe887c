#![no_main]
use libfuzzer_sys::fuzz_target;
use pipe_core::{EventBuffer, OutputFormat, Render};

fuzz_target!(|data: &[u8]| {
    // Decoding arbitrary bytes must never panic, and a successful decode
    // must re-encode to something that decodes to the same collection.
    if let Ok(events) = pipe_core::buffer::decode(data) {
        let buffer = EventBuffer::from_events(events.clone());
        let again = pipe_core::buffer::decode(buffer.as_bytes()).expect("re-encoded buffer decodes");
        assert_eq!(again, events);
    }
    let _ = EventBuffer::from_bytes(data.to_vec()).render(OutputFormat::Text);
});
