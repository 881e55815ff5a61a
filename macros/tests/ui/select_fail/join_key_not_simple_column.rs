fn main() {
    let op = drizzle_macros::define_select!(|q| q
        .from("users")
        .join(
            q.from("departments"),
            |u| u.name.trim(),
            |d| d.id,
            None
        )
        .build());
    let _ = op;
}
