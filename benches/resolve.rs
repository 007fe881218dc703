use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use hashview::{
    core::{raw_msg::LinkTarget, translator::translate_raw_to_domain},
    RawMsg, RouteTable,
};

const FRAGMENTS: [&str; 8] = [
    "#/",
    "#/projects",
    "#/work",
    "#/about",
    "#/contact",
    "",
    "#contact",
    "#/projects/atlas",
];

fn benchmark(c: &mut Criterion) {
    let routes = RouteTable::default();
    c.bench_function("resolve", |b| {
        b.iter(|| {
            for fragment in FRAGMENTS {
                black_box(routes.resolve(black_box(fragment)));
            }
        })
    });

    let hovers: Vec<RawMsg> = FRAGMENTS
        .iter()
        .map(|href| RawMsg::MouseOver {
            link: Some(LinkTarget::anchor(*href)),
        })
        .collect();
    c.bench_function("translate-hover", |b| {
        b.iter(|| {
            for raw in &hovers {
                black_box(translate_raw_to_domain(black_box(raw)));
            }
        })
    });
}

criterion_group!(benches, benchmark);
criterion_main!(benches);
