fn main() {
    let threshold = 18;
    let op = drizzle_macros::define_select!(|q| q
        .from("users")
        .where_(|u| u.age >= threshold)
        .build());
    let _ = op;
}
