fn main() {
    let op = drizzle_macros::define_select!(|q| q
        .from("users")
        .then_by(|u| u.name)
        .build());
    let _ = op;
}
