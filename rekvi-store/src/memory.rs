use async_trait::async_trait;
use chrono::Utc;
use rekvi_basket::{BasketGateway, BasketLine, BasketWrite};
use rekvi_catalog::{CatalogGateway, CatalogQuery, Material};
use rekvi_core::remote::RemoteError;
use rekvi_core::user::{
    ContactUpdate, DeliveryDefaults, RegisteredAddress, UserGateway, UserProfile,
};
use rekvi_favorites::{FavoriteEntry, FavoritesGateway};
use rekvi_order::history::{OrderHistoryGateway, OrderLine, OrderRecord, TrackTrace};
use rekvi_order::{OrderGateway, OrderPayload, OrderReceipt, ZipLookupGateway};
use rekvi_shared::pii::Masked;
use rekvi_shared::{MaterialId, UserNo};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

/// In-memory stand-in for the remote webshop service, implementing every
/// gateway trait. Failures are reported as the OData-style error documents
/// the real service produces, so the message extraction path is exercised
/// end to end.
///
/// Locks are plain `Mutex`es: no guard is ever held across an await.
pub struct MemoryStore {
    materials: Mutex<Vec<Material>>,
    baskets: Mutex<HashMap<UserNo, Vec<BasketLine>>>,
    favorites: Mutex<Vec<FavoriteEntry>>,
    orders: Mutex<Vec<OrderRecord>>,
    users: Mutex<HashMap<UserNo, UserProfile>>,
    zips: Mutex<HashMap<String, String>>,
    unavailable: Mutex<HashSet<MaterialId>>,
    next_order_number: AtomicU64,
    fail_next_order: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            materials: Mutex::new(Vec::new()),
            baskets: Mutex::new(HashMap::new()),
            favorites: Mutex::new(Vec::new()),
            orders: Mutex::new(Vec::new()),
            users: Mutex::new(HashMap::new()),
            zips: Mutex::new(HashMap::new()),
            unavailable: Mutex::new(HashSet::new()),
            next_order_number: AtomicU64::new(5_000_000),
            fail_next_order: AtomicBool::new(false),
        }
    }

    /// A store preloaded with a small Danish development dataset.
    pub fn seeded() -> Self {
        let store = Self::new();

        for (no, short, long, supplier, keywords, multiple) in [
            (
                "100010",
                "Nitrilhandsker M",
                "Nitril undersøgelseshandsker, størrelse M",
                "SUP-88",
                "handsker beskyttelse",
                10,
            ),
            (
                "100011",
                "Nitrilhandsker L",
                "Nitril undersøgelseshandsker, størrelse L",
                "SUP-88",
                "handsker beskyttelse",
                10,
            ),
            (
                "200340",
                "Kompres 10x10",
                "Sterile kompresser 10x10 cm",
                "SUP-12",
                "forbinding sår",
                25,
            ),
            (
                "200355",
                "Plaster rulle",
                "Hæfteplaster på rulle, 5 m",
                "SUP-12",
                "forbinding",
                5,
            ),
            (
                "301200",
                "Kanyler 21G",
                "Engangskanyler 21G grøn",
                "SUP-45",
                "injektion",
                100,
            ),
        ] {
            store.insert_material(Material {
                id: MaterialId::new(),
                material_no: no.to_string(),
                short_name: short.to_string(),
                long_name: long.to_string(),
                supplier_code: supplier.to_string(),
                keywords: keywords.to_string(),
                unit_multiple: multiple,
                included_in_favorites: String::new(),
            });
        }

        for (zip, city) in [
            ("8000", "Aarhus C"),
            ("2100", "København Ø"),
            ("5000", "Odense C"),
            ("9000", "Aalborg"),
        ] {
            store.insert_zip(zip, city);
        }

        // One shipped order from before the seed, with a tracking link.
        let shipped_material = store.material_by_no("100010");
        store.insert_order(OrderRecord {
            order_number: "4999900".to_string(),
            user_no: UserNo::from("0000123"),
            status: "SHIP".to_string(),
            created_at: Utc::now(),
            items: shipped_material
                .into_iter()
                .map(|m| OrderLine {
                    material_id: m.id,
                    material_no: m.material_no,
                    display_name: m.short_name,
                    quantity: m.unit_multiple,
                    track_traces: vec![TrackTrace {
                        url: "https://tracking.example.dk/4999900".to_string(),
                        status_text: "Afsendt".to_string(),
                        quantity: "1".to_string(),
                        created_date: "2026-08-01".to_string(),
                    }],
                })
                .collect(),
        });

        store.insert_user(UserProfile {
            user_no: UserNo::from("0000123"),
            name: "Lægerne Gasvej".to_string(),
            department: "Klinik 2".to_string(),
            registered: RegisteredAddress {
                street: "Gasvej".to_string(),
                house_no: "14".to_string(),
                zip: "8000".to_string(),
                city: "Aarhus C".to_string(),
            },
            delivery_defaults: DeliveryDefaults::default(),
            phone: Masked::new("87654321".to_string()),
            email: Masked::new("klinik@example.dk".to_string()),
        });

        store
    }

    pub fn insert_material(&self, material: Material) {
        self.materials.lock().unwrap().push(material);
    }

    pub fn insert_user(&self, profile: UserProfile) {
        self.users
            .lock()
            .unwrap()
            .insert(profile.user_no.clone(), profile);
    }

    pub fn insert_zip(&self, zip: &str, city: &str) {
        self.zips
            .lock()
            .unwrap()
            .insert(zip.to_string(), city.to_string());
    }

    pub fn insert_order(&self, order: OrderRecord) {
        self.orders.lock().unwrap().push(order);
    }

    /// Make subsequent basket writes for this material fail the way the
    /// backend rejects discontinued materials.
    pub fn mark_unavailable(&self, id: MaterialId) {
        self.unavailable.lock().unwrap().insert(id);
    }

    /// Fail the next order submission with a service error.
    pub fn fail_next_order(&self) {
        self.fail_next_order.store(true, Ordering::SeqCst);
    }

    pub fn material_by_no(&self, material_no: &str) -> Option<Material> {
        self.materials
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.material_no == material_no)
            .cloned()
    }

    fn find_material(&self, id: MaterialId) -> Option<Material> {
        self.materials
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == id)
            .cloned()
    }

    fn rewrite_memberships(&self, id: MaterialId, f: impl FnOnce(Vec<String>) -> Vec<String>) {
        let mut materials = self.materials.lock().unwrap();
        if let Some(material) = materials.iter_mut().find(|m| m.id == id) {
            let lists = f(material.favorite_memberships());
            material.included_in_favorites = lists.join(", ");
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn odata_error(status: u16, message: &str) -> RemoteError {
    let body = serde_json::json!({
        "error": {
            "message": { "value": message }
        }
    });
    RemoteError::from_body(status, body.to_string())
}

#[async_trait]
impl BasketGateway for MemoryStore {
    async fn create(&self, write: &BasketWrite) -> Result<(), RemoteError> {
        if self.unavailable.lock().unwrap().contains(&write.material_id) {
            let body = serde_json::json!({
                "error": {
                    "message": { "value": "Request failed" },
                    "innererror": {
                        "errordetails": [
                            { "message": "Material is no longer available" }
                        ]
                    }
                }
            });
            return Err(RemoteError::from_body(400, body.to_string()));
        }

        let material = self
            .find_material(write.material_id)
            .ok_or_else(|| odata_error(404, "Material not found"))?;

        let mut baskets = self.baskets.lock().unwrap();
        let lines = baskets.entry(write.user_no.clone()).or_default();
        match lines
            .iter_mut()
            .find(|l| l.material_id == write.material_id)
        {
            Some(line) => {
                line.quantity += write.quantity_delta;
                if line.quantity <= 0 {
                    lines.retain(|l| l.material_id != write.material_id);
                }
            }
            None if write.quantity_delta > 0 => {
                lines.push(BasketLine {
                    user_no: write.user_no.clone(),
                    material_id: write.material_id,
                    quantity: write.quantity_delta,
                    unit_multiple: material.unit_multiple,
                    display_name: material.short_name.clone(),
                });
            }
            None => return Err(odata_error(400, "No basket line for material")),
        }
        Ok(())
    }

    async fn query(&self, user: &UserNo) -> Result<Vec<BasketLine>, RemoteError> {
        Ok(self
            .baskets
            .lock()
            .unwrap()
            .get(user)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl CatalogGateway for MemoryStore {
    async fn query(
        &self,
        _user: &UserNo,
        query: &CatalogQuery,
    ) -> Result<Vec<Material>, RemoteError> {
        Ok(self
            .materials
            .lock()
            .unwrap()
            .iter()
            .filter(|m| query.matches(m))
            .cloned()
            .collect())
    }

    async fn get(&self, _user: &UserNo, id: MaterialId) -> Result<Option<Material>, RemoteError> {
        Ok(self.find_material(id))
    }
}

#[async_trait]
impl OrderGateway for MemoryStore {
    async fn submit(&self, payload: &OrderPayload) -> Result<OrderReceipt, RemoteError> {
        if self.fail_next_order.swap(false, Ordering::SeqCst) {
            return Err(odata_error(503, "Order could not be created"));
        }

        let number = self.next_order_number.fetch_add(1, Ordering::SeqCst);
        let lines = self
            .baskets
            .lock()
            .unwrap()
            .remove(&payload.user_no)
            .unwrap_or_default();
        let items = lines
            .into_iter()
            .map(|line| OrderLine {
                material_no: self
                    .find_material(line.material_id)
                    .map(|m| m.material_no)
                    .unwrap_or_default(),
                material_id: line.material_id,
                display_name: line.display_name,
                quantity: line.quantity,
                track_traces: Vec::new(),
            })
            .collect();
        self.orders.lock().unwrap().push(OrderRecord {
            order_number: number.to_string(),
            user_no: payload.user_no.clone(),
            status: "CONF".to_string(),
            created_at: Utc::now(),
            items,
        });

        Ok(OrderReceipt {
            order_number: number.to_string(),
        })
    }
}

#[async_trait]
impl OrderHistoryGateway for MemoryStore {
    async fn query(&self, user: &UserNo) -> Result<Vec<OrderRecord>, RemoteError> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| &o.user_no == user)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ZipLookupGateway for MemoryStore {
    async fn resolve(&self, zip: &str) -> Result<Option<String>, RemoteError> {
        Ok(self.zips.lock().unwrap().get(zip).cloned())
    }
}

#[async_trait]
impl FavoritesGateway for MemoryStore {
    async fn create(&self, entry: &FavoriteEntry) -> Result<(), RemoteError> {
        {
            let mut favorites = self.favorites.lock().unwrap();
            if !favorites.contains(entry) {
                favorites.push(entry.clone());
            }
        }
        self.rewrite_memberships(entry.material_id, |mut lists| {
            if !lists.contains(&entry.list_name) {
                lists.push(entry.list_name.clone());
            }
            lists
        });
        Ok(())
    }

    async fn delete(&self, entry: &FavoriteEntry) -> Result<(), RemoteError> {
        self.favorites.lock().unwrap().retain(|e| e != entry);
        self.rewrite_memberships(entry.material_id, |mut lists| {
            lists.retain(|l| l != &entry.list_name);
            lists
        });
        Ok(())
    }

    async fn query(&self, user: &UserNo) -> Result<Vec<FavoriteEntry>, RemoteError> {
        Ok(self
            .favorites
            .lock()
            .unwrap()
            .iter()
            .filter(|e| &e.user_no == user)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UserGateway for MemoryStore {
    async fn fetch(&self, user: &UserNo) -> Result<UserProfile, RemoteError> {
        self.users
            .lock()
            .unwrap()
            .get(user)
            .cloned()
            .ok_or_else(|| odata_error(404, "User not found"))
    }

    async fn update_contact(
        &self,
        user: &UserNo,
        update: &ContactUpdate,
    ) -> Result<(), RemoteError> {
        let mut users = self.users.lock().unwrap();
        let profile = users
            .get_mut(user)
            .ok_or_else(|| odata_error(404, "User not found"))?;
        profile.delivery_defaults = DeliveryDefaults {
            street: update.delivery_street.clone(),
            zip: update.delivery_zip.clone(),
            city: update.delivery_city.clone(),
        };
        profile.phone = update.phone.clone();
        profile.email = update.email.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserNo {
        UserNo::from("0000123")
    }

    #[tokio::test]
    async fn basket_deltas_net_out_and_remove_the_line() {
        let store = MemoryStore::seeded();
        let material = store.material_by_no("100010").unwrap();

        let write = |delta| BasketWrite {
            user_no: user(),
            material_id: material.id,
            quantity_delta: delta,
        };

        BasketGateway::create(&store, &write(10)).await.unwrap();
        BasketGateway::create(&store, &write(10)).await.unwrap();
        let lines = BasketGateway::query(&store, &user()).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 20);

        BasketGateway::create(&store, &write(-20)).await.unwrap();
        assert!(BasketGateway::query(&store, &user())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn unavailable_material_reports_the_detail_message() {
        let store = MemoryStore::seeded();
        let material = store.material_by_no("100010").unwrap();
        store.mark_unavailable(material.id);

        let err = BasketGateway::create(
            &store,
            &BasketWrite {
                user_no: user(),
                material_id: material.id,
                quantity_delta: 10,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(
            err.user_message("fallback"),
            "Material is no longer available"
        );
    }

    #[tokio::test]
    async fn submission_clears_the_basket_and_appends_history() {
        let store = MemoryStore::seeded();
        let material = store.material_by_no("200340").unwrap();

        BasketGateway::create(
            &store,
            &BasketWrite {
                user_no: user(),
                material_id: material.id,
                quantity_delta: 25,
            },
        )
        .await
        .unwrap();

        let payload = OrderPayload {
            user_no: user(),
            name: "Lægerne Gasvej".to_string(),
            name2: String::new(),
            street: "Gasvej 14".to_string(),
            zip: "8000".to_string(),
            city: "Aarhus C".to_string(),
            att: String::new(),
            phone: "87654321".to_string(),
            email: String::new(),
        };
        let receipt = OrderGateway::submit(&store, &payload).await.unwrap();
        assert_eq!(receipt.order_number, "5000000");

        assert!(BasketGateway::query(&store, &user())
            .await
            .unwrap()
            .is_empty());

        let orders = OrderHistoryGateway::query(&store, &user()).await.unwrap();
        let order = orders
            .iter()
            .find(|o| o.order_number == "5000000")
            .unwrap();
        assert!(!order.is_closed());
        assert_eq!(order.items[0].material_no, "200340");
        assert_eq!(order.items[0].quantity, 25);
    }

    #[tokio::test]
    async fn failed_submission_keeps_the_basket() {
        let store = MemoryStore::seeded();
        let material = store.material_by_no("200340").unwrap();

        BasketGateway::create(
            &store,
            &BasketWrite {
                user_no: user(),
                material_id: material.id,
                quantity_delta: 25,
            },
        )
        .await
        .unwrap();

        store.fail_next_order();
        let payload = OrderPayload {
            user_no: user(),
            name: String::new(),
            name2: String::new(),
            street: String::new(),
            zip: String::new(),
            city: String::new(),
            att: String::new(),
            phone: String::new(),
            email: String::new(),
        };
        let err = OrderGateway::submit(&store, &payload).await.unwrap_err();
        assert_eq!(err.user_message("fallback"), "Order could not be created");
        assert_eq!(
            BasketGateway::query(&store, &user()).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn favorite_writes_keep_material_memberships_in_sync() {
        let store = MemoryStore::seeded();
        let material = store.material_by_no("100010").unwrap();
        let entry = FavoriteEntry {
            user_no: user(),
            list_name: "Akut".to_string(),
            material_id: material.id,
        };

        FavoritesGateway::create(&store, &entry).await.unwrap();
        let refreshed = store.material_by_no("100010").unwrap();
        assert_eq!(refreshed.favorite_memberships(), vec!["Akut".to_string()]);

        FavoritesGateway::delete(&store, &entry).await.unwrap();
        let refreshed = store.material_by_no("100010").unwrap();
        assert!(refreshed.favorite_memberships().is_empty());
    }

    #[tokio::test]
    async fn contact_update_rewrites_delivery_defaults() {
        let store = MemoryStore::seeded();
        let update = ContactUpdate {
            delivery_street: "Elmevej 3".to_string(),
            delivery_zip: "8000".to_string(),
            delivery_city: "Aarhus C".to_string(),
            phone: Masked::new("12345678".to_string()),
            email: Masked::new("ny@example.dk".to_string()),
        };

        UserGateway::update_contact(&store, &user(), &update)
            .await
            .unwrap();
        let profile = UserGateway::fetch(&store, &user()).await.unwrap();
        assert_eq!(profile.delivery_defaults.street, "Elmevej 3");
        assert_eq!(profile.phone.inner(), "12345678");
    }
}
