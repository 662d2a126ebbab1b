//! Diagnostics emitted while building components

use parking_lot::Mutex;
use std::io;
use std::sync::Arc;
use tessera_di::prelude::*;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl Capture {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for Capture {
    type Writer = Capture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn with_captured_logs<R>(filter: &str, f: impl FnOnce() -> R) -> (R, String) {
    let capture = Capture::default();
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(capture.clone())
        .with_ansi(false)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, capture.contents())
}

#[test]
fn test_build_and_eager_creation_are_logged() {
    let (component, logs) = with_captured_logs("tessera_di=debug", || {
        let mut module = Module::named("core");
        module.eager_singleton(|_| Ok(5_u32));
        Component::builder()
            .module(module)
            .config(ComponentConfig::named("app"))
            .build()
            .unwrap()
    });

    assert!(component.is_instantiated(&Key::of::<u32>()));
    assert!(logs.contains("Built component app"), "logs: {logs}");
    assert!(logs.contains("Eagerly instantiated u32"), "logs: {logs}");
}

#[test]
fn test_failed_eager_creation_is_warned() {
    let (result, logs) = with_captured_logs("tessera_di=warn", || {
        let mut module = Module::new();
        module.eager_singleton::<u32, _>(|_| Err(DiError::provider(anyhow::anyhow!("disk full"))));
        Component::new(&[module])
    });

    assert!(result.is_err());
    assert!(logs.contains("WARN"), "logs: {logs}");
    assert!(logs.contains("Eager instantiation of u32 failed"), "logs: {logs}");
    assert!(logs.contains("disk full"), "logs: {logs}");
    assert!(!logs.contains("Built component"));
}

#[test]
fn test_resolution_tracing_reports_cache_hits() {
    let component = {
        let mut module = Module::new();
        module.singleton(|_| Ok("cached".to_string()));
        Component::new(&[module]).unwrap()
    };

    let (_, logs) = with_captured_logs("tessera_di=trace", || {
        component.inject_now::<String>().unwrap();
        component.inject_now::<String>().unwrap();
    });

    assert!(logs.contains("Creating cached instance for alloc::string::String"), "logs: {logs}");
    assert!(logs.contains("Cache hit for alloc::string::String"), "logs: {logs}");
}
