//! Throughput benchmarks for the operator chain's hottest paths:
//! iterating a source, applying `map`, and draining an unbounded buffer.
//! All single-threaded — there is no concurrent path to benchmark.

use std::cell::Cell;
use std::rc::Rc;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use fluxion::emitter::Emitter;
use fluxion::pipe::Pipe;
use fluxion::receiver::Receiver;
use fluxion::source;
use fluxion::BoxError;

const SIZES: [usize; 3] = [128, 1_024, 8_192];

struct CountingReceiver {
    count: Cell<usize>,
}

impl Receiver<usize> for CountingReceiver {
    fn open(&self, pipe: Rc<dyn Pipe>) {
        pipe.request_all();
    }

    fn receive(&self, _item: usize) {
        self.count.set(self.count.get() + 1);
    }

    fn complete(&self) {}

    fn error(&self, _err: BoxError) {}
}

fn drain(emitter: impl Emitter<usize>) -> usize {
    let receiver = Rc::new(CountingReceiver { count: Cell::new(0) });
    emitter.subscribe(receiver.clone());
    receiver.count.get()
}

fn iterable_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("iterable_throughput");
    for size in SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| drain(source::iterable(0..size)));
        });
    }
    group.finish();
}

fn map_passthrough(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_passthrough");
    for size in SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| drain(source::iterable(0..size).map(|n| n + 1)));
        });
    }
    group.finish();
}

fn buffer_unbounded_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer_unbounded_throughput");
    for size in SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| drain(source::iterable(0..size).buffer_unbounded()));
        });
    }
    group.finish();
}

criterion_group!(benches, iterable_throughput, map_passthrough, buffer_unbounded_throughput);
criterion_main!(benches);
