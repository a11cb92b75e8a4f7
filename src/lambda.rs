#[cfg(feature = "lambda")]
use contact_relay::adapters::apigateway::{self, ProxyRequest, ProxyResponse};
#[cfg(feature = "lambda")]
use contact_relay::utils::logger::{self, LogFormat};
#[cfg(feature = "lambda")]
use contact_relay::LambdaConfig;
#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};

#[cfg(feature = "lambda")]
async fn function_handler(event: LambdaEvent<ProxyRequest>) -> Result<ProxyResponse, Error> {
    // Settings and the API key are read on every invocation so that updated
    // function configuration applies without a cold start.
    let relay = LambdaConfig::from_env().and_then(LambdaConfig::into_relay);

    Ok(apigateway::respond(event.payload, relay).await)
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_logger(LogFormat::Json, false);

    run(service_fn(function_handler)).await
}
