use std::io::Result;

fn main() -> Result<()> {
    let proto_files = &["proto/user.proto", "proto/address.proto", "proto/doctor.proto"];
    let includes = &["proto"];

    tonic_build::configure()
        .build_server(true)
        .build_client(false)
        .compile_protos(proto_files, includes)?;

    for proto in proto_files {
        println!("cargo:rerun-if-changed={}", proto);
    }

    Ok(())
}
