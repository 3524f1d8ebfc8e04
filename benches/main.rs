#[macro_use]
extern crate criterion;


criterion_group!(benches, crate::skiplist::benchmark, crate::store::benchmark);
criterion_main!(benches);
