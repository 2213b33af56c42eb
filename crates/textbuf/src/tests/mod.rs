mod growth;
mod transcode;
