fn main() {
    let base = Row { name: "a".to_string(), age: 1 };
    let stmt = drizzle_macros::define_insert!(|q| q
        .insert("users", Row { name: "b".to_string(), ..base })
        .build());
    let _ = stmt;
}
