use crate::dialect;
use rowkit::{BindMap, Connection, Database, Fields, Model, Result, RowLabeled, Value, binds};

#[derive(Debug, Clone, PartialEq)]
struct Product {
    id: Option<i64>,
    name: String,
    price: f64,
    in_stock: bool,
    notes: Option<String>,
}

impl Model for Product {
    fn table() -> &'static str {
        "products"
    }
    fn from_row(row: &RowLabeled) -> Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            price: row.get("price")?,
            in_stock: row.get("in_stock")?,
            notes: row.get("notes")?,
        })
    }
    fn fields(&self) -> Fields {
        binds! {
            "id" => self.id,
            "name" => self.name.clone(),
            "price" => self.price,
            "in_stock" => self.in_stock,
            "notes" => self.notes.clone(),
        }
    }
    fn primary_key(&self) -> Option<Value> {
        self.id.map(Into::into)
    }
    fn set_primary_key(&mut self, id: i64) {
        self.id = Some(id);
    }
}

pub async fn products<C: Connection>(database: &mut Database<C>) {
    let none = BindMap::new();

    // Setup
    database
        .run("DROP TABLE IF EXISTS products", &none)
        .await
        .expect("Failed to drop the products table");
    let create = dialect(
        database,
        "CREATE TABLE products (id INTEGER PRIMARY KEY, name VARCHAR(50) NOT NULL, price REAL, in_stock BOOLEAN, notes TEXT)",
        "CREATE TABLE products (id INT AUTO_INCREMENT PRIMARY KEY, name VARCHAR(50) NOT NULL, price DOUBLE, in_stock BOOLEAN, notes TEXT)",
    );
    database
        .run(create, &none)
        .await
        .expect("Failed to create the products table");

    // Save inserts
    let mut lamp = Product {
        id: None,
        name: "Lamp".into(),
        price: 24.5,
        in_stock: true,
        notes: None,
    };
    lamp.save(database).await.expect("Failed to save the lamp");
    let id = lamp.id.expect("The lamp did not receive an identity");
    let mut chair = Product {
        id: None,
        name: "Chair".into(),
        price: 80.0,
        in_stock: false,
        notes: Some("Oak".into()),
    };
    chair.save(database).await.expect("Failed to save the chair");
    assert_ne!(chair.id, lamp.id);

    // Load
    let loaded = Product::find(database, id)
        .await
        .expect("Failed to load the lamp")
        .expect("The lamp is missing");
    assert_eq!(loaded, lamp);
    let loaded: Product = database
        .load(chair.id)
        .await
        .expect("Failed to load the chair")
        .expect("The chair is missing");
    assert_eq!(loaded, chair);
    assert_eq!(Product::find(database, 12345).await, Ok(None));

    // Save updates
    lamp.price = 19.99;
    lamp.notes = Some("Discounted".into());
    lamp.save(database).await.expect("Failed to update the lamp");
    assert_eq!(lamp.id, Some(id));
    let loaded = Product::find(database, id)
        .await
        .expect("Failed to reload the lamp")
        .expect("The lamp is missing");
    assert_eq!(loaded.price, 19.99);
    assert_eq!(loaded.notes.as_deref(), Some("Discounted"));

    // Delete
    assert_eq!(chair.delete(database).await, Ok(1));
    assert_eq!(Product::find(database, chair.id).await, Ok(None));
    let rows = database
        .select("products", &BindMap::new(), None)
        .await
        .expect("Failed to select the products");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get_column("in_stock"), Some(&Value::Boolean(true)));
    assert_eq!(rows[0].get_column("price"), Some(&Value::Float64(19.99)));
}
