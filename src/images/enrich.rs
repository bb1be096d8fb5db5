//! Enrichment orchestration: attach an image URL to every itinerary entry.
//!
//! All entries are flattened into independent lookup tasks and fanned out
//! through a semaphore-bounded pool. Tasks only ever produce a URL for
//! their own item, so results are written back by item key once the whole
//! fan-out has completed. A task that finds nothing falls back to the
//! deterministic placeholder, so enrichment always terminates with every
//! `image` field set.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, info};

use crate::images::placeholder::{classify, placeholder_url, Category};
use crate::images::wiki::ImageSource;
use crate::models::Itinerary;

/// Address of one itinerary entry within the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemKey {
    Hotel(usize),
    Place { day: usize, place: usize },
    Food(usize),
}

/// Transient pairing of an item address with its lookup inputs
#[derive(Debug, Clone)]
struct ImageTask {
    key: ItemKey,
    name: String,
    category: Category,
}

/// Image enrichment service
pub struct Enricher {
    source: Arc<dyn ImageSource>,
    max_workers: usize,
}

impl Enricher {
    pub fn new(source: Arc<dyn ImageSource>, max_workers: usize) -> Self {
        Self {
            source,
            max_workers: max_workers.max(1),
        }
    }

    /// Attach an image URL to every hotel, place and food entry in place
    pub async fn enrich(&self, itinerary: &mut Itinerary, destination: &str) {
        let tasks = flatten_tasks(itinerary);
        if tasks.is_empty() {
            return;
        }
        info!(
            tasks = tasks.len(),
            workers = self.max_workers,
            "Enriching itinerary with images"
        );

        let semaphore = Arc::new(Semaphore::new(self.max_workers));
        let lookups = tasks.into_iter().map(|task| {
            let source = Arc::clone(&self.source);
            let semaphore = Arc::clone(&semaphore);
            let destination = destination.to_string();
            async move {
                // The semaphore is never closed while lookups are running.
                let _permit = semaphore.acquire().await.expect("semaphore closed");
                let url = resolve_with_fallback(source.as_ref(), &task, &destination).await;
                (task.key, url)
            }
        });

        for (key, url) in futures::future::join_all(lookups).await {
            write_back(itinerary, key, url);
        }
    }
}

/// Look up an image with city context, then name-only, then the placeholder
async fn resolve_with_fallback(
    source: &dyn ImageSource,
    task: &ImageTask,
    destination: &str,
) -> String {
    if let Some(url) = source.resolve(&task.name, Some(destination)).await {
        return url;
    }
    if let Some(url) = source.resolve(&task.name, None).await {
        return url;
    }
    debug!("No image found for {:?}, using placeholder", task.name);
    placeholder_url(task.category, destination, &task.name)
}

fn flatten_tasks(itinerary: &Itinerary) -> Vec<ImageTask> {
    let mut tasks = Vec::new();

    for (i, hotel) in itinerary.hotels.iter().enumerate() {
        tasks.push(ImageTask {
            key: ItemKey::Hotel(i),
            name: hotel.name.clone(),
            category: classify(&hotel.name, Category::Hotel),
        });
    }
    for (d, day) in itinerary.itinerary.iter().enumerate() {
        for (p, place) in day.places.iter().enumerate() {
            tasks.push(ImageTask {
                key: ItemKey::Place { day: d, place: p },
                name: place.name.clone(),
                category: classify(&place.name, Category::Place),
            });
        }
    }
    for (i, food) in itinerary.food.iter().enumerate() {
        tasks.push(ImageTask {
            key: ItemKey::Food(i),
            name: food.name.clone(),
            category: classify(&food.name, Category::Food),
        });
    }

    tasks
}

fn write_back(itinerary: &mut Itinerary, key: ItemKey, url: String) {
    match key {
        ItemKey::Hotel(i) => {
            if let Some(hotel) = itinerary.hotels.get_mut(i) {
                hotel.image = Some(url);
            }
        }
        ItemKey::Place { day, place } => {
            if let Some(entry) = itinerary
                .itinerary
                .get_mut(day)
                .and_then(|d| d.places.get_mut(place))
            {
                entry.image = Some(url);
            }
        }
        ItemKey::Food(i) => {
            if let Some(food) = itinerary.food.get_mut(i) {
                food.image = Some(url);
            }
        }
    }
}
