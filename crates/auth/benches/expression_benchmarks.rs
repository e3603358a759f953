use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use adminhub_auth::{MenuTree, Permission, PermissionExpression, SubjectPermissionSet, admin};

fn granted(n: usize) -> SubjectPermissionSet {
    (0..n)
        .map(|i| Permission::new(format!("TOKEN_{i}")))
        .chain([admin::ROLE_SELECT])
        .collect()
}

/// `satisfies` should stay flat as the subject's grant count grows.
fn bench_satisfies(c: &mut Criterion) {
    let mut group = c.benchmark_group("satisfies");
    let expr = PermissionExpression::parse(admin::ROLE_PAGE).unwrap();

    for size in [1usize, 16, 256, 4096] {
        let set = granted(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &set, |b, set| {
            b.iter(|| black_box(expr.satisfies(black_box(set))));
        });
    }

    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_user_group", |b| {
        b.iter(|| PermissionExpression::parse(black_box(admin::USER_GROUP)).unwrap());
    });
}

fn bench_menu_filter(c: &mut Criterion) {
    let tree = MenuTree::admin_console().unwrap();
    let set = granted(64);

    c.bench_function("filter_admin_console_menu", |b| {
        b.iter(|| black_box(tree.visible_to(black_box(&set))));
    });
}

criterion_group!(benches, bench_satisfies, bench_parse, bench_menu_filter);
criterion_main!(benches);
