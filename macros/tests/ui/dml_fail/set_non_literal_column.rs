fn main() {
    let column_name = "active";
    let stmt = drizzle_macros::define_update!(|q, p| q
        .update("users")
        .set(column_name, p.active)
        .where_(|u| u.id == p.id)
        .build());
    let _ = stmt;
}
