use criterion::{criterion_group, criterion_main, Criterion};

use attachguard::config::PolicyConfig;
use attachguard::model::attachment::AttachmentRecord;
use attachguard::platform::snapshot::DeviceSnapshot;
use attachguard::platform::{NetworkClass, Platform};
use attachguard::policy::evaluate;

fn bench_evaluate(c: &mut Criterion) {
    let config = PolicyConfig::default();
    let snapshot = DeviceSnapshot {
        network: NetworkClass::Metered,
        view_handlers: 1,
        ..DeviceSnapshot::default()
    };
    let platform = Platform::from_device(&snapshot);
    let records = [
        AttachmentRecord::new("photo.jpg", "image/jpeg", 1000, 1),
        AttachmentRecord::new("setup.EXE", "", 1000, 2),
        AttachmentRecord::new("game.apk", "", 10_000_000, 3),
        AttachmentRecord::new("archive", "application/octet-stream", 500, 4),
    ];

    c.bench_function("evaluate_mixed_attachments", |b| {
        b.iter(|| {
            records
                .iter()
                .filter(|r| evaluate(r, &config, &platform).eligible_for_download())
                .count()
        })
    });
}

criterion_group!(benches, bench_evaluate);
criterion_main!(benches);
