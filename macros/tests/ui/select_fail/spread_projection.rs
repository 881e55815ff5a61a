fn main() {
    let op = drizzle_macros::define_select!(|q| q
        .from("users")
        .select(|u| Row { id: u.id, ..u })
        .build());
    let _ = op;
}
