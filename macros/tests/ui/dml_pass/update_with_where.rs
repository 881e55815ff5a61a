fn main() {
    let stmt: drizzle_core::ir::UpdateStatement = drizzle_macros::define_update!(|q, p| q
        .update("users")
        .set("active", p.active)
        .where_(|u| u.id == p.id)
        .build());
    let _ = stmt;
}
