pub mod reload_corpus_route;
