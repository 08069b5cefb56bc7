use tracing::warn;

use semsearch_core::{Document, Embedding, EmbeddingError, VectorStore};

use crate::RetrievalError;

/// Outcome of one ingest call. `skipped` lists documents whose text could
/// not be embedded; everything else was upserted.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub indexed: usize,
    pub skipped: Vec<SkippedDocument>,
}

#[derive(Debug)]
pub struct SkippedDocument {
    pub id: String,
    pub reason: String,
}

/// Ingest pipeline: embeds document text and upserts the result, metadata
/// and original content included, so results can be displayed without a
/// second lookup.
pub struct Indexer<E, S> {
    embedder: E,
    store: S,
}

impl<E, S> Indexer<E, S>
where
    E: Embedding,
    S: VectorStore,
{
    pub fn new(embedder: E, store: S) -> Self {
        Self { embedder, store }
    }

    /// Embed and upsert `docs`. A document whose embedding fails is skipped
    /// and reported; the rest of the batch still goes through. Blank ids are
    /// caller error and fail the whole call up front.
    pub async fn ingest(&self, docs: Vec<Document>) -> Result<IngestReport, RetrievalError> {
        for doc in &docs {
            if doc.id.trim().is_empty() {
                return Err(RetrievalError::InvalidId(doc.id.clone()));
            }
        }

        let texts: Vec<String> = docs.iter().map(|doc| doc.content.clone()).collect();
        let embedded: Vec<Result<Document, (String, EmbeddingError)>> = match self
            .embedder
            .embed_batch(&texts)
            .await
        {
            Ok(embeddings) => docs
                .into_iter()
                .zip(embeddings)
                .map(|(mut doc, embedding)| {
                    doc.embedding = Some(embedding);
                    Ok(doc)
                })
                .collect::<Vec<_>>(),
            // The batch call cannot say which document failed; retry one at
            // a time to isolate and report the bad ones.
            Err(batch_err) => {
                warn!(error = %batch_err, "batch embedding failed, retrying per document");
                let mut out = Vec::with_capacity(docs.len());
                for mut doc in docs {
                    match self.embedder.embed(&doc.content).await {
                        Ok(embedding) => {
                            doc.embedding = Some(embedding);
                            out.push(Ok(doc));
                        }
                        Err(err) => out.push(Err((doc.id, err))),
                    }
                }
                out
            }
        };

        let mut report = IngestReport::default();
        let mut to_upsert = Vec::with_capacity(embedded.len());
        for entry in embedded {
            match entry {
                Ok(doc) => to_upsert.push(doc),
                Err((id, err)) => {
                    warn!(document = %id, error = %err, "skipping document: embedding failed");
                    report.skipped.push(SkippedDocument {
                        id,
                        reason: err.to_string(),
                    });
                }
            }
        }

        report.indexed = to_upsert.len();
        if !to_upsert.is_empty() {
            self.store.upsert(to_upsert).await?;
        }
        Ok(report)
    }
}
