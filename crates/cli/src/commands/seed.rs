//! Seed the database with demo data.
//!
//! Creates a demo user owning one store, stocks a handful of fruits, and
//! registers a supplier. Existing rows are left alone, so the command is
//! safe to re-run.

use chrono::Utc;
use tracing::info;

use quitanda_core::{Email, InventoryItemId, StoreId, SupplierId, TaxId};
use quitanda_server::db::{
    self, InventoryRepository, StoreRepository, SupplierRepository, UserRepository,
};
use quitanda_server::models::{InventoryItem, Store, Supplier};

/// CNPJ identifying the demo store across re-runs.
const DEMO_STORE_CNPJ: &str = "12.345.678/0001-90";

/// CNPJ identifying the demo supplier.
const DEMO_SUPPLIER_CNPJ: &str = "98.765.432/0001-10";

/// Fruits stocked for the demo store: name, quantity, unit.
const DEMO_FRUITS: &[(&str, i64, &str)] = &[
    ("Apple", 120, "kg"),
    ("Banana", 80, "kg"),
    ("Mango", 35, "unit"),
    ("Papaya", 15, "unit"),
];

/// Seed the database with a demo user, store, inventory, and supplier.
///
/// # Errors
///
/// Returns an error if the email or a built-in CNPJ fails validation, or
/// if a database operation fails.
pub async fn run(email: &str, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let email = Email::parse(email)?;

    let pool = db::create_pool(&super::database_url()).await?;
    db::run_migrations(&pool).await?;
    info!("Connected to database");

    let user = UserRepository::new(&pool).find_or_create(&email, name).await?;
    info!(user_id = %user.id, email = %user.email, "Demo user ready");

    // Reuse the demo store if a previous run created it
    let stores = StoreRepository::new(&pool);
    let store = match stores
        .list_for_user(user.id)
        .await?
        .into_iter()
        .find(|store| store.cnpj.as_str() == DEMO_STORE_CNPJ)
    {
        Some(store) => {
            info!(store_id = %store.id, "Demo store already exists, reusing");
            store
        }
        None => {
            let now = Utc::now();
            let store = Store {
                id: StoreId::new(),
                user_id: user.id,
                name: "Quitanda do Centro".to_string(),
                cnpj: TaxId::parse(DEMO_STORE_CNPJ)?,
                employees: 3,
                address: "Rua das Laranjeiras, 10".to_string(),
                phone: Some("+55 11 91234-5678".to_string()),
                email: Some("contato@quitandadocentro.com.br".to_string()),
                created_at: now,
                updated_at: now,
            };
            stores.create(&store).await?;
            info!(store_id = %store.id, "Demo store created");
            store
        }
    };

    let inventory = InventoryRepository::new(&pool);
    let mut stocked: usize = 0;
    for &(fruit, quantity, unit) in DEMO_FRUITS {
        if inventory.get_by_fruit(store.id, fruit).await?.is_some() {
            continue;
        }
        let now = Utc::now();
        inventory
            .create(&InventoryItem {
                id: InventoryItemId::new(),
                store_id: store.id,
                fruit: fruit.to_string(),
                quantity,
                unit: unit.to_string(),
                created_at: now,
                updated_at: now,
            })
            .await?;
        stocked += 1;
    }
    info!(
        stocked,
        skipped = DEMO_FRUITS.len() - stocked,
        "Inventory seeded"
    );

    let suppliers = SupplierRepository::new(&pool);
    let supplier_exists = suppliers
        .list_by_store(store.id)
        .await?
        .iter()
        .any(|supplier| supplier.cnpj.as_str() == DEMO_SUPPLIER_CNPJ);
    if supplier_exists {
        info!("Demo supplier already exists, skipping");
    } else {
        let now = Utc::now();
        let supplier = Supplier {
            id: SupplierId::new(),
            store_id: store.id,
            name: "Sítio Boa Fruta".to_string(),
            cnpj: TaxId::parse(DEMO_SUPPLIER_CNPJ)?,
            address: "Estrada Velha, km 12".to_string(),
            fruits: vec!["Apple".to_string(), "Banana".to_string(), "Mango".to_string()],
            created_at: now,
            updated_at: now,
        };
        suppliers.create(&supplier).await?;
        info!(supplier_id = %supplier.id, "Demo supplier created");
    }

    info!("Seeding complete!");
    Ok(())
}
