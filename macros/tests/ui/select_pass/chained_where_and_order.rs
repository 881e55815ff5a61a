fn main() {
    let min_age: i64 = 18;
    let op: drizzle_core::ir::Operation = drizzle_macros::define_select!(|q, p| q
        .from("users")
        .where_(|u| u.age >= p.min_age)
        .order_by_descending(|u| u.name)
        .then_by(|u| u.id)
        .take(10)
        .build());
    let _ = (op, min_age);
}
